//! Secondary canvas painting the magnified neighborhood.
//!
//! The panel spreads the current zoom snapshot across its whole surface.
//! It draws from the snapshot alone, so it stays in lockstep with
//! whatever the main grid resolved for each mirrored cell.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color::palette;
use crate::error::Result;
use crate::render::backend::label_color;
use crate::zoom::{ZoomSlot, ZoomSnapshot};

use super::renderer::LABEL_FONT_FAMILY;

/// Border width picking out the focus slot in the center.
const FOCUS_BORDER: f64 = 2.0;
const SLOT_PADDING: f64 = 4.0;
const MAX_SLOT_LABEL_PX: f64 = 16.0;

/// Magnified view painter for a dedicated canvas element.
pub struct ZoomPanel {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    dpr: f32,
}

impl ZoomPanel {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;

        let width = canvas.width();
        let height = canvas.height();

        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let _ = self.ctx.scale(f64::from(dpr), f64::from(dpr));
    }

    fn logical_size(&self) -> (f64, f64) {
        let dpr = f64::from(self.dpr);
        (f64::from(self.width) / dpr, f64::from(self.height) / dpr)
    }

    /// Paint a snapshot across the whole surface; `None` clears the panel.
    pub fn paint(&self, snapshot: Option<&ZoomSnapshot>) {
        let (w, h) = self.logical_size();
        self.ctx.set_fill_style_str(palette::WHITE);
        self.ctx.fill_rect(0.0, 0.0, w, h);

        let Some(snapshot) = snapshot else {
            return;
        };
        let rows = snapshot.window.rows();
        let cols = snapshot.window.cols();
        if rows == 0 || cols == 0 {
            return;
        }
        let slot_w = w / f64::from(cols);
        let slot_h = h / f64::from(rows);

        for row in 0..rows {
            for col in 0..cols {
                if let Some(slot) = snapshot.slot(row, col) {
                    let x = f64::from(col) * slot_w;
                    let y = f64::from(row) * slot_h;
                    self.draw_slot(slot, x, y, slot_w, slot_h);
                }
            }
        }

        // Focus outline on top of the center slot.
        let cx = f64::from(cols / 2) * slot_w;
        let cy = f64::from(rows / 2) * slot_h;
        self.ctx.set_stroke_style_str(palette::HOVER_FILL);
        self.ctx.set_line_width(FOCUS_BORDER);
        self.ctx.stroke_rect(
            cx + FOCUS_BORDER / 2.0,
            cy + FOCUS_BORDER / 2.0,
            slot_w - FOCUS_BORDER,
            slot_h - FOCUS_BORDER,
        );
    }

    /// One slot: mirrored fill, border, word. Blank slots stay white.
    fn draw_slot(&self, slot: &ZoomSlot, x: f64, y: f64, w: f64, h: f64) {
        if slot.is_blank() {
            return;
        }

        if slot.fill.opacity < 1.0 {
            self.ctx.set_global_alpha(slot.fill.opacity);
            self.ctx.set_fill_style_str(&slot.fill.color);
            self.ctx.fill_rect(x, y, w, h);
            self.ctx.set_global_alpha(1.0);
        } else if slot.fill.color != palette::WHITE {
            self.ctx.set_fill_style_str(&slot.fill.color);
            self.ctx.fill_rect(x, y, w, h);
        }
        self.ctx.set_stroke_style_str(palette::CELL_STROKE);
        self.ctx.set_line_width(1.0);
        self.ctx.stroke_rect(x.floor() + 0.5, y.floor() + 0.5, w.floor(), h.floor());

        if let Some(word) = &slot.word {
            let px = (h * 0.35).min(MAX_SLOT_LABEL_PX);
            self.ctx.set_font(&format!("{px}px {LABEL_FONT_FAMILY}"));
            self.ctx.set_fill_style_str(label_color(&slot.fill));
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            let max_width = (w - 2.0 * SLOT_PADDING).max(1.0);
            let _ = self
                .ctx
                .fill_text_with_max_width(word, x + w / 2.0, y + h / 2.0, max_width);
        }
    }
}
