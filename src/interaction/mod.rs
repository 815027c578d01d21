//! Pointer-driven state: the animation driver and graphic marks.

mod animation;
mod mark;
mod mark_store;
pub mod templates;

pub use animation::AnimationDriver;
pub use mark::{
    ClickOutcome, DrawStep, GraphicData, GraphicGroup, GraphicMark, GraphicShape, HoverType,
    MarkGeometry, MarkId, MarkTemplate, TextSource, pixel_from_point, point_from_pixel,
    resolve_point,
};
pub use mark_store::GraphicMarkStore;
