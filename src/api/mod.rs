//! Host-facing container wiring a draw widget to its collaborators.

mod pane;
mod pane_config;

pub use pane::CandlePane;
pub use pane_config::CandlePaneConfig;
