use serde::{Deserialize, Serialize};

/// Granularity of a requested redraw.
///
/// Ordered by strength. `All` and `Drawer` both repaint the two canvases;
/// `Drawer` is the variant forced by a backing-store resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpdateLevel {
    Main,
    Overlay,
    #[default]
    All,
    Drawer,
}

impl UpdateLevel {
    #[must_use]
    pub const fn strength(self) -> u8 {
        match self {
            Self::Main => 0,
            Self::Overlay => 1,
            Self::All => 2,
            Self::Drawer => 3,
        }
    }

    /// Smallest level covering both requests: main and overlay together
    /// need `All`, and `Drawer` absorbs everything.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Main, Self::Overlay) | (Self::Overlay, Self::Main) => Self::All,
            _ if self.strength() >= other.strength() => self,
            _ => other,
        }
    }

    #[must_use]
    pub const fn dispatch(self) -> RedrawDispatch {
        match self {
            Self::Main => RedrawDispatch::Main,
            Self::Overlay => RedrawDispatch::Overlay,
            Self::All | Self::Drawer => RedrawDispatch::Both,
        }
    }
}

/// Which canvases one executed frame repaints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedrawDispatch {
    Main,
    Overlay,
    Both,
}

impl RedrawDispatch {
    #[must_use]
    pub const fn includes_main(self) -> bool {
        matches!(self, Self::Main | Self::Both)
    }

    #[must_use]
    pub const fn includes_overlay(self) -> bool {
        matches!(self, Self::Overlay | Self::Both)
    }
}
