//! Axis index labels along the grid margins.
//!
//! Column indices run across the bottom margin and row indices down the
//! left margin as a reading aid. Labels thin out automatically when
//! bands get too narrow to keep them apart.

use crate::color::palette;
use crate::render::backend::RenderParams;

use super::renderer::CanvasRenderer;

const AXIS_FONT: &str = "10px Arial";
/// Minimum pixels between adjacent labels before thinning kicks in.
const MIN_LABEL_STEP: f64 = 18.0;
/// Gap between a label and the plotting area edge.
const LABEL_INSET: f64 = 5.0;

/// Label every n-th band for the given step size.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(super) fn label_stride(step: f64) -> usize {
    if step <= 0.0 || step >= MIN_LABEL_STEP {
        1
    } else {
        // Ratio is > 1 here, so ceil() is at least 2.
        (MIN_LABEL_STEP / step).ceil() as usize
    }
}

/// Draw row and column indices in the margins.
pub(super) fn render_axis_labels(renderer: &CanvasRenderer, params: &RenderParams) {
    let ctx = &renderer.ctx;
    ctx.set_font(AXIS_FONT);
    ctx.set_fill_style_str(palette::AXIS_TEXT);

    let x_scale = &params.geometry.x;
    let y_scale = &params.geometry.y;

    if f64::from(params.config.margin.bottom) > MIN_LABEL_STEP {
        ctx.set_text_align("center");
        ctx.set_text_baseline("top");
        // Just below the bottom edge of the plotting area.
        let y = f64::from(y_scale.end()) + LABEL_INSET;
        let stride = label_stride(f64::from(x_scale.step()));
        for col in (0..x_scale.count()).step_by(stride) {
            let _ = ctx.fill_text(&col.to_string(), f64::from(x_scale.center(col)), y);
        }
    }

    if f64::from(params.config.margin.left) > MIN_LABEL_STEP {
        ctx.set_text_align("right");
        ctx.set_text_baseline("middle");
        // Right-aligned against the left edge of the plotting area.
        let x = f64::from(x_scale.origin()) - LABEL_INSET;
        let stride = label_stride(f64::from(y_scale.step()));
        for row in (0..y_scale.count()).step_by(stride) {
            let _ = ctx.fill_text(&row.to_string(), x, f64::from(y_scale.center(row)));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_label_stride_thins_dense_axes() {
        assert_eq!(label_stride(110.0), 1);
        assert_eq!(label_stride(18.0), 1);
        assert_eq!(label_stride(9.0), 2);
        assert_eq!(label_stride(4.0), 5);
        assert_eq!(label_stride(0.0), 1);
    }
}
