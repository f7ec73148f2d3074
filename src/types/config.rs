use crate::layout::LayoutMode;
use crate::zoom::ZoomWindow;

/// Margins around the plotting area, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn uniform(px: f32) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(30.0)
    }
}

/// Configuration for the grid view.
///
/// Defaults match the canonical layout: a 720x720 logical canvas with 30px
/// margins on all sides and a 1% band gap between cells.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Logical canvas width in pixels.
    pub width: f32,
    /// Logical canvas height in pixels.
    pub height: f32,
    /// Margins reserved for axis labels around the plotting area.
    pub margin: Margins,
    /// Fraction of each band left as a gap between cells (0.0 to <1.0).
    pub band_padding: f32,
    /// How records are placed on the grid (flat or page-tiled).
    pub layout: LayoutMode,
    /// Dimensions of the magnified neighborhood view.
    pub zoom_window: ZoomWindow,
}

impl GridConfig {
    /// Plotting-area width (canvas width minus horizontal margins).
    pub fn inner_width(&self) -> f32 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Plotting-area height (canvas height minus vertical margins).
    pub fn inner_height(&self) -> f32 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 720.0,
            margin: Margins::default(),
            band_padding: 0.01,
            layout: LayoutMode::Flat,
            zoom_window: ZoomWindow::default(),
        }
    }
}
