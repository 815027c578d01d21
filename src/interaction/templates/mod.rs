//! Built-in graphic mark variants, addressable by name.

mod fibonacci;
mod lines;
mod price;

pub use fibonacci::FibonacciLine;
pub use lines::{
    HorizontalRayLine, HorizontalSegment, HorizontalStraightLine, ParallelStraightLine,
    PriceChannelLine, RayLine, Segment, StraightLine, VerticalSegment, VerticalStraightLine,
};
pub use price::PriceLine;

use crate::interaction::MarkTemplate;

/// Names accepted by `create_template`, in menu order.
pub const BUILTIN_MARK_NAMES: [&str; 12] = [
    "segment",
    "rayLine",
    "straightLine",
    "horizontalStraightLine",
    "horizontalRayLine",
    "horizontalSegment",
    "verticalStraightLine",
    "verticalSegment",
    "priceLine",
    "parallelStraightLine",
    "priceChannelLine",
    "fibonacciLine",
];

#[must_use]
pub fn create_template(name: &str) -> Option<Box<dyn MarkTemplate>> {
    let template: Box<dyn MarkTemplate> = match name {
        "segment" => Box::new(Segment),
        "rayLine" => Box::new(RayLine),
        "straightLine" => Box::new(StraightLine),
        "horizontalStraightLine" => Box::new(HorizontalStraightLine),
        "horizontalRayLine" => Box::new(HorizontalRayLine),
        "horizontalSegment" => Box::new(HorizontalSegment),
        "verticalStraightLine" => Box::new(VerticalStraightLine),
        "verticalSegment" => Box::new(VerticalSegment),
        "priceLine" => Box::new(PriceLine),
        "parallelStraightLine" => Box::new(ParallelStraightLine),
        "priceChannelLine" => Box::new(PriceChannelLine),
        "fibonacciLine" => Box::new(FibonacciLine),
        _ => return None,
    };
    Some(template)
}
