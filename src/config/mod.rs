mod styles;

pub use styles::{
    AreaPointStyles, CandleAreaStyles, CandleBarStyles, CandleStyles, CandleType, ChartStyles,
    GraphicMarkStyles, MarkLineStyles, MarkPointStyles, MarkTextStyles, SeparatorStyles,
};
