//! kline-core: rendering core of a financial candlestick chart.
//!
//! A pane is a double-buffered `DrawWidget` (main canvas plus an overlay
//! canvas) whose views turn the visible data window into figures. Redraws
//! are requested by level and coalesced into one frame; interactive
//! graphic marks live on the overlay so hover and drag never repaint the
//! candles. Drawing surfaces, frame scheduling and the data store are
//! collaborators supplied by the host.

pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod figure;
pub mod interaction;
pub mod render;
pub mod telemetry;
pub mod view;
pub mod widget;

pub use api::{CandlePane, CandlePaneConfig};
pub use error::{ChartError, ChartResult};
