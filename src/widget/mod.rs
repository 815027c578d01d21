//! Double-buffered draw widget with tiered invalidation and frame coalescing.

mod draw_widget;
mod redraw;
mod scheduler;
mod update_level;

pub use draw_widget::{DrawWidget, WidgetContent};
pub use redraw::{RedrawQueue, RedrawTrigger};
pub use scheduler::{FrameHandle, FrameScheduler, ManualFrameScheduler};
pub use update_level::{RedrawDispatch, UpdateLevel};
