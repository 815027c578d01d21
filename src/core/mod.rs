pub mod axis;
pub mod geometry;
pub mod pane;
pub mod primitives;
pub mod store;
pub mod types;

pub use axis::{Axis, IndexAxis, LinearAxis};
pub use geometry::LineType;
pub use pane::PaneId;
pub use store::{DataStore, TimeSeriesStore};
pub use types::{
    BarSpace, Bounding, Coordinate, KLineData, Precision, TimePricePoint, VisibleData,
};
