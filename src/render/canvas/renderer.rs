//! Canvas 2D rendering backend.
//!
//! Implements the RenderBackend trait using HTML Canvas 2D API via web-sys.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color::palette;
use crate::error::Result;
use crate::layout::CellRect;
use crate::render::backend::{label_color, CellFill, CellRenderData, RenderBackend, RenderParams};
use crate::types::CellId;

use super::axes::render_axis_labels;

/// UI Constants
pub(super) const CELL_PADDING: f64 = 3.0;
pub(super) const MIN_LABEL_PX: f64 = 6.0;
pub(super) const MAX_LABEL_PX: f64 = 13.0;
pub(super) const LABEL_FONT_FAMILY: &str = "Arial";
const TEXT_MEASURE_CACHE_CAP: usize = 4096;

pub(super) struct TextMeasureCache {
    entries: HashMap<Rc<str>, f64>,
    order: VecDeque<Rc<str>>,
    max_entries: usize,
    scratch: String,
}

impl TextMeasureCache {
    fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
            scratch: String::new(),
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn get(&mut self, font: &str, text: &str) -> Option<f64> {
        if self.max_entries == 0 {
            return None;
        }
        let key = Self::build_key(&mut self.scratch, font, text);
        self.entries.get(key).copied()
    }

    fn insert(&mut self, font: &str, text: &str, width: f64) {
        if self.max_entries == 0 {
            return;
        }
        let key = Self::build_key(&mut self.scratch, font, text);
        if self.entries.contains_key(key) {
            return;
        }
        let key_rc: Rc<str> = key.into();
        self.entries.insert(Rc::clone(&key_rc), width);
        self.order.push_back(key_rc);
        self.enforce_cap();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn build_key<'a>(scratch: &'a mut String, font: &str, text: &str) -> &'a str {
        scratch.clear();
        scratch.reserve(font.len() + 1 + text.len());
        scratch.push_str(font);
        scratch.push('\n');
        scratch.push_str(text);
        scratch.as_str()
    }

    fn enforce_cap(&mut self) {
        while self.entries.len() > self.max_entries {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }
}

/// Base label size for a cell of the given height.
pub(super) fn label_font_px(cell_height: f64) -> f64 {
    (cell_height * 0.4).clamp(MIN_LABEL_PX, MAX_LABEL_PX)
}

/// Shrink `base_px` so text measured at `base_px` fits into `avail`.
/// Glyph width scales linearly with font size, so one measurement is
/// enough. Never shrinks below the legible minimum.
pub(super) fn fit_font_px(base_px: f64, text_width: f64, avail: f64) -> f64 {
    if text_width <= avail || text_width <= 0.0 {
        base_px
    } else {
        (base_px * avail / text_width).max(MIN_LABEL_PX)
    }
}

/// Canvas 2D renderer implementing the RenderBackend trait
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    pub(crate) ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    dpr: f32,
    /// Cache for text measurements (key: "font\ntext")
    text_measure_cache: TextMeasureCache,
}

impl CanvasRenderer {
    /// Create a new Canvas renderer from an HtmlCanvasElement
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
            text_measure_cache: TextMeasureCache::new(TEXT_MEASURE_CACHE_CAP),
        })
    }

    /// Set the CSS dimensions of the canvas element (logical pixels).
    pub fn set_canvas_css_size(&self, css_w: f32, css_h: f32) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{css_w}px"));
        let _ = style.set_property("height", &format!("{css_h}px"));
    }

    /// Surface size in logical pixels (physical size divided by DPR).
    pub fn logical_size(&self) -> (f64, f64) {
        let dpr = f64::from(self.dpr);
        (f64::from(self.width) / dpr, f64::from(self.height) / dpr)
    }

    /// Helper to get crisp pixel position for 1px lines
    pub(super) fn crisp(x: f64) -> f64 {
        x.floor() + 0.5
    }

    /// Draw a filled rectangle
    pub(super) fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    /// Draw a 1px rectangle outline aligned to the pixel grid
    pub(super) fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(1.0);
        self.ctx
            .stroke_rect(Self::crisp(x), Self::crisp(y), w.floor(), h.floor());
    }

    /// Measure one line of text, consulting the cache first.
    pub(super) fn measure_text(&mut self, font: &str, text: &str) -> f64 {
        if let Some(width) = self.text_measure_cache.get(font, text) {
            return width;
        }
        self.ctx.set_font(font);
        let width = self
            .ctx
            .measure_text(text)
            .map_or(0.0, |metrics| metrics.width());
        self.text_measure_cache.insert(font, text, width);
        width
    }

    /// Paint one cell: base underpaint, highlight fill, border, fitted label.
    ///
    /// The white underpaint makes partial repaints idempotent for
    /// translucent fills; without it a repeated tint would accumulate.
    fn draw_cell(&mut self, params: &RenderParams, data: &CellRenderData) {
        let rect = params.geometry.rect(data.cell);
        let x = f64::from(rect.x);
        let y = f64::from(rect.y);
        let w = f64::from(rect.width);
        let h = f64::from(rect.height);
        if w <= 0.0 || h <= 0.0 {
            return;
        }

        let fill = params.fill(data.cell);
        self.fill_rect(x, y, w, h, palette::WHITE);
        if fill.opacity < 1.0 {
            self.ctx.set_global_alpha(fill.opacity);
            self.fill_rect(x, y, w, h, &fill.color);
            self.ctx.set_global_alpha(1.0);
        } else if fill.color != palette::WHITE {
            self.fill_rect(x, y, w, h, &fill.color);
        }
        self.stroke_rect(x, y, w, h, palette::CELL_STROKE);
        self.draw_label(&data.word, &rect, &fill);
    }

    /// Draw a word centered in its cell, scaled down to fit.
    fn draw_label(&mut self, word: &str, rect: &CellRect, fill: &CellFill) {
        if word.is_empty() {
            return;
        }
        let w = f64::from(rect.width);
        let h = f64::from(rect.height);
        let avail = w - 2.0 * CELL_PADDING;
        if avail <= 0.0 || h < MIN_LABEL_PX + 2.0 {
            return;
        }

        let base_px = label_font_px(h);
        let base_font = format!("{base_px}px {LABEL_FONT_FAMILY}");
        let text_width = self.measure_text(&base_font, word);
        let px = fit_font_px(base_px, text_width, avail);

        self.ctx.set_font(&format!("{px}px {LABEL_FONT_FAMILY}"));
        self.ctx.set_fill_style_str(label_color(fill));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let cx = f64::from(rect.x) + w / 2.0;
        let cy = f64::from(rect.y) + h / 2.0;
        // max_width backstop: the linear fit is approximate.
        let _ = self
            .ctx
            .fill_text_with_max_width(word, cx, cy, avail.max(1.0));
    }
}

impl RenderBackend for CanvasRenderer {
    fn init(&mut self) -> Result<()> {
        // Canvas 2D doesn't need explicit initialization
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.text_measure_cache.clear();

        // Set canvas buffer size to physical pixels
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        // Scale context for DPR (all drawing uses logical coordinates after this)
        let _ = self.ctx.scale(f64::from(dpr), f64::from(dpr));
    }

    fn render(&mut self, params: &RenderParams) -> Result<()> {
        let (w, h) = self.logical_size();
        self.fill_rect(0.0, 0.0, w, h, palette::WHITE);
        render_axis_labels(self, params);
        for data in params.cells {
            self.draw_cell(params, data);
        }
        Ok(())
    }

    fn render_cells(&mut self, params: &RenderParams, cells: &[CellId]) -> Result<()> {
        for cell in cells {
            let Some(&idx) = params.cell_lookup.get(cell) else {
                continue;
            };
            if let Some(data) = params.cells.get(idx) {
                self.draw_cell(params, data);
            }
        }
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_text_measure_cache_reuses_entries() {
        let mut cache = TextMeasureCache::new(2);
        assert_eq!(cache.get("11px Arial", "hello"), None);
        cache.insert("11px Arial", "hello", 12.0);
        assert_eq!(cache.get("11px Arial", "hello"), Some(12.0));
        cache.insert("11px Arial", "hello", 22.0);
        assert_eq!(cache.get("11px Arial", "hello"), Some(12.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_text_measure_cache_enforces_cap() {
        let mut cache = TextMeasureCache::new(2);
        cache.insert("11px Arial", "a", 1.0);
        cache.insert("11px Arial", "b", 2.0);
        cache.insert("11px Arial", "c", 3.0);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("11px Arial", "a"), None);
        assert_eq!(cache.get("11px Arial", "b"), Some(2.0));
        assert_eq!(cache.get("11px Arial", "c"), Some(3.0));
    }

    #[test]
    fn test_label_font_px_clamps() {
        assert_eq!(label_font_px(100.0), MAX_LABEL_PX);
        assert_eq!(label_font_px(4.0), MIN_LABEL_PX);
        assert_eq!(label_font_px(25.0), 10.0);
    }

    #[test]
    fn test_fit_font_px_shrinks_and_floors() {
        // Fits: unchanged.
        assert_eq!(fit_font_px(12.0, 40.0, 50.0), 12.0);
        // Twice too wide: halved.
        assert_eq!(fit_font_px(12.0, 100.0, 50.0), 6.0);
        // Way too wide: floored at the minimum.
        assert_eq!(fit_font_px(12.0, 1000.0, 10.0), MIN_LABEL_PX);
    }
}
