//! Main PictoView struct - the primary entry point for the grid viewer.
//!
//! This module provides the WASM-exported `PictoView` struct that handles:
//! - Loading and parsing pictogram CSV data
//! - Holding the dataset, band-scale geometry, and interaction state
//! - Coordinating highlight transitions with Canvas 2D rendering
//! - Handling user interactions (hover, search, marks, page overlay)
//!
//! Hover handlers are automatically registered on the canvas when the
//! viewer is created - no manual JavaScript wiring required.

mod events;

use std::collections::HashMap;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use web_sys::{HtmlCanvasElement, HtmlElement, MouseEvent};

use crate::color::{PageColorAssigner, PageColors};
use crate::csv;
use crate::layout::{GridGeometry, LayoutMode};
use crate::render::backend::{fill_for, CellFill, CellRenderData};
#[cfg(target_arch = "wasm32")]
use crate::render::{CanvasRenderer, RenderBackend, RenderParams, ZoomPanel};
use crate::state::{InteractionState, Repaint};
#[cfg(target_arch = "wasm32")]
use crate::layout::GridDimensions;
use crate::types::{CellId, Dataset, GridConfig};
#[cfg(not(target_arch = "wasm32"))]
use crate::types::{DatasetSummary, PictogramRecord};
use crate::zoom::zoom_snapshot;
#[cfg(not(target_arch = "wasm32"))]
use crate::zoom::ZoomSnapshot;

/// Shared state that can be accessed by event handlers (wasm32 only)
#[cfg(target_arch = "wasm32")]
pub(crate) struct SharedState {
    pub(crate) dataset: Option<Dataset>,
    pub(crate) geometry: GridGeometry,
    pub(crate) cells: Vec<CellRenderData>,
    pub(crate) cell_lookup: HashMap<CellId, usize>,
    pub(crate) page_colors: PageColors,
    pub(crate) interaction: InteractionState,
    pub(crate) config: GridConfig,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) dpr: f32,
    pub(crate) needs_render: bool,
    pub(crate) needs_zoom_render: bool,
    /// Cells queued for partial repaint on the next `render()`.
    pub(crate) dirty_cells: Vec<CellId>,
    pub(crate) render_callback: Option<Function>,
}

/// Everything derived from one CSV load.
pub(crate) struct LoadedGrid {
    pub(crate) dataset: Dataset,
    pub(crate) geometry: GridGeometry,
    pub(crate) cells: Vec<CellRenderData>,
    pub(crate) cell_lookup: HashMap<CellId, usize>,
    pub(crate) page_colors: PageColors,
}

/// Parse CSV bytes and derive the dataset, geometry, render list, and
/// page colors in one pass.
pub(crate) fn build_grid(data: &[u8], config: &GridConfig) -> crate::error::Result<LoadedGrid> {
    let records = csv::parse_records(data)?;
    let dataset = Dataset::build(records, config.layout);
    let geometry = GridGeometry::new(config, dataset.dims());
    let (cells, cell_lookup) = render_list(&dataset);
    let page_colors = PageColorAssigner::new().assign(dataset.pages());
    Ok(LoadedGrid {
        dataset,
        geometry,
        cells,
        cell_lookup,
        page_colors,
    })
}

/// Flatten the occupancy winners into the render list plus its lookup.
pub(crate) fn render_list(dataset: &Dataset) -> (Vec<CellRenderData>, HashMap<CellId, usize>) {
    let mut cells = Vec::with_capacity(dataset.len());
    let mut lookup = HashMap::with_capacity(dataset.len());
    for (cell, record) in dataset.visible_cells() {
        let page_idx = dataset.pages().index_of(&record.page).unwrap_or(0);
        lookup.insert(cell, cells.len());
        cells.push(CellRenderData {
            cell,
            word: record.word.clone(),
            page_idx,
        });
    }
    (cells, lookup)
}

/// The occupied cell under a pointer position, if any. Gaps between
/// cells, the margins, and empty cells all miss.
pub(crate) fn hover_target(
    geometry: &GridGeometry,
    dataset: Option<&Dataset>,
    x: f32,
    y: f32,
) -> Option<CellId> {
    let cell = geometry.cell_at(x, y)?;
    dataset.filter(|d| d.is_occupied(cell)).map(|_| cell)
}

/// The resting fill of a cell (hover excluded), resolved against the
/// page palette. Shared by the zoom mirror on both targets.
pub(crate) fn resting_fill_of(
    interaction: &InteractionState,
    cells: &[CellRenderData],
    cell_lookup: &HashMap<CellId, usize>,
    page_colors: &PageColors,
    cell: CellId,
) -> CellFill {
    let page_color = cell_lookup
        .get(&cell)
        .and_then(|&idx| cells.get(idx))
        .and_then(|data| page_colors.get(data.page_idx));
    fill_for(interaction.resting_highlight_for(cell), page_color)
}

/// The main viewer struct exported to JavaScript
#[wasm_bindgen]
pub struct PictoView {
    #[cfg(target_arch = "wasm32")]
    state: Rc<RefCell<SharedState>>,
    #[cfg(target_arch = "wasm32")]
    renderer: CanvasRenderer,
    #[cfg(target_arch = "wasm32")]
    zoom_panel: Option<ZoomPanel>,
    #[cfg(target_arch = "wasm32")]
    #[allow(dead_code)] // Kept alive so the event listeners stay valid
    closures: Vec<Closure<dyn FnMut(MouseEvent)>>,

    // Non-wasm32 fields
    #[cfg(not(target_arch = "wasm32"))]
    dataset: Option<Dataset>,
    #[cfg(not(target_arch = "wasm32"))]
    geometry: GridGeometry,
    #[cfg(not(target_arch = "wasm32"))]
    cells: Vec<CellRenderData>,
    #[cfg(not(target_arch = "wasm32"))]
    cell_lookup: HashMap<CellId, usize>,
    #[cfg(not(target_arch = "wasm32"))]
    page_colors: PageColors,
    #[cfg(not(target_arch = "wasm32"))]
    interaction: InteractionState,
    #[cfg(not(target_arch = "wasm32"))]
    config: GridConfig,
    #[cfg(not(target_arch = "wasm32"))]
    #[allow(dead_code)]
    width: u32,
    #[cfg(not(target_arch = "wasm32"))]
    #[allow(dead_code)]
    height: u32,
    #[cfg(not(target_arch = "wasm32"))]
    #[allow(dead_code)]
    dpr: f32,
    #[cfg(not(target_arch = "wasm32"))]
    needs_render: bool,
}

// ============================================================================
// WASM32 Implementation
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl PictoView {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, dpr: f32) -> Result<PictoView, JsValue> {
        Self::create(canvas, None, dpr)
    }

    /// Create a viewer with a secondary canvas for the magnified view.
    pub fn new_with_zoom(
        canvas: HtmlCanvasElement,
        zoom_canvas: HtmlCanvasElement,
        dpr: f32,
    ) -> Result<PictoView, JsValue> {
        Self::create(canvas, Some(zoom_canvas), dpr)
    }

    /// Load pictogram CSV bytes and lay out the grid.
    pub fn load(&mut self, data: &[u8]) -> Result<(), JsValue> {
        let grid = {
            let s = self.state.borrow();
            build_grid(data, &s.config)
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut s = self.state.borrow_mut();
        s.dataset = Some(grid.dataset);
        s.geometry = grid.geometry;
        s.cells = grid.cells;
        s.cell_lookup = grid.cell_lookup;
        s.page_colors = grid.page_colors;
        s.interaction = InteractionState::new();
        s.needs_render = true;
        s.needs_zoom_render = true;
        s.dirty_cells.clear();
        let callback = s.render_callback.clone();
        drop(s);

        Self::invoke_render_callback(callback);
        Ok(())
    }

    /// Exact-word search: highlight every cell whose word equals `text`.
    pub fn search(&mut self, text: &str) {
        Self::apply_transition(&self.state, |s| match &s.dataset {
            Some(dataset) => s.interaction.search(text, dataset),
            None => Repaint::none(),
        });
    }

    /// Make the current search matches sticky.
    pub fn mark_matches(&mut self) {
        Self::apply_transition(&self.state, |s| s.interaction.mark_matches());
    }

    /// Clear search matches, marks, the page overlay, and the hover.
    pub fn reset(&mut self) {
        Self::apply_transition(&self.state, |s| s.interaction.reset());
    }

    /// Toggle the per-page color overlay.
    pub fn toggle_page_colors(&mut self) {
        Self::apply_transition(&self.state, |s| s.interaction.toggle_pages_overlay());
    }

    /// Switch between flat and page-tiled layout, re-laying out any
    /// loaded dataset.
    pub fn set_paged(&mut self, paged: bool) {
        let mode = if paged {
            LayoutMode::paged()
        } else {
            LayoutMode::Flat
        };
        let callback = {
            let mut s = self.state.borrow_mut();
            let s = &mut *s;
            if s.config.layout == mode {
                None
            } else {
                s.config.layout = mode;
                if let Some(dataset) = s.dataset.take() {
                    let rebuilt = Dataset::build(dataset.into_records(), mode);
                    s.geometry = GridGeometry::new(&s.config, rebuilt.dims());
                    let (cells, lookup) = render_list(&rebuilt);
                    s.cells = cells;
                    s.cell_lookup = lookup;
                    s.dataset = Some(rebuilt);
                    // Highlight cell sets are stale after a re-layout.
                    s.interaction = InteractionState::new();
                }
                s.needs_render = true;
                s.needs_zoom_render = true;
                s.dirty_cells.clear();
                s.render_callback.clone()
            }
        };
        Self::invoke_render_callback(callback);
    }

    /// Draw pending work: a full frame, queued partial repaints, and the
    /// zoom panel, whichever are flagged.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let mut s = self.state.borrow_mut();
        let needs_full = s.needs_render;
        let dirty: Vec<CellId> = s.dirty_cells.drain(..).collect();
        let needs_zoom = s.needs_zoom_render;
        if !needs_full && dirty.is_empty() && !needs_zoom {
            return Ok(());
        }

        {
            let s_ref: &SharedState = &s;
            let params = RenderParams {
                cells: &s_ref.cells,
                cell_lookup: &s_ref.cell_lookup,
                geometry: &s_ref.geometry,
                config: &s_ref.config,
                state: &s_ref.interaction,
                page_colors: &s_ref.page_colors,
                dpr: s_ref.dpr,
            };
            if needs_full {
                self.renderer
                    .render(&params)
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
            } else if !dirty.is_empty() {
                self.renderer
                    .render_cells(&params, &dirty)
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
            }
        }
        s.needs_render = false;

        if needs_zoom {
            if let Some(panel) = self.zoom_panel.as_ref() {
                let snapshot = {
                    let s_ref: &SharedState = &s;
                    s_ref.interaction.zoom_focus().and_then(|focus| {
                        s_ref.dataset.as_ref().map(|dataset| {
                            zoom_snapshot(focus, s_ref.config.zoom_window, dataset, |cell| {
                                resting_fill_of(
                                    &s_ref.interaction,
                                    &s_ref.cells,
                                    &s_ref.cell_lookup,
                                    &s_ref.page_colors,
                                    cell,
                                )
                            })
                        })
                    })
                };
                panel.paint(snapshot.as_ref());
            }
            s.needs_zoom_render = false;
        }
        Ok(())
    }

    /// Resize the main canvas (physical pixels) and re-derive geometry.
    pub fn resize(&mut self, physical_width: u32, physical_height: u32, dpr: f32) {
        self.renderer
            .resize(physical_width.max(1), physical_height.max(1), dpr);

        let callback = {
            let mut s = self.state.borrow_mut();
            let s = &mut *s;
            s.width = physical_width;
            s.height = physical_height;
            s.dpr = dpr;
            s.config.width = physical_width as f32 / dpr;
            s.config.height = physical_height as f32 / dpr;
            let dims = s.dataset.as_ref().map(|d| *d.dims()).unwrap_or_default();
            s.geometry = GridGeometry::new(&s.config, &dims);
            s.needs_render = true;
            s.needs_zoom_render = true;
            s.dirty_cells.clear();
            s.render_callback.clone()
        };
        Self::invoke_render_callback(callback);
    }

    /// Resize the zoom canvas (physical pixels).
    pub fn resize_zoom(&mut self, physical_width: u32, physical_height: u32, dpr: f32) {
        if let Some(panel) = self.zoom_panel.as_mut() {
            panel.resize(physical_width.max(1), physical_height.max(1), dpr);
            let mut s = self.state.borrow_mut();
            s.needs_zoom_render = true;
            let callback = s.render_callback.clone();
            drop(s);
            Self::invoke_render_callback(callback);
        }
    }

    /// Register a JS callback to request a render on the next animation frame.
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }

    /// Dataset summary (record/page/duplicate counts and grid extent) as
    /// a JS object, or `null` before a load.
    pub fn summary(&self) -> JsValue {
        let s = self.state.borrow();
        match s.dataset.as_ref().map(Dataset::summary) {
            Some(summary) => serde_wasm_bindgen::to_value(&summary).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Word under the pointer, if any.
    pub fn hovered_word(&self) -> Option<String> {
        let s = self.state.borrow();
        s.interaction.hovered().and_then(|cell| {
            s.dataset
                .as_ref()
                .and_then(|d| d.record_at(cell))
                .map(|record| record.word.clone())
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl PictoView {
    fn create(
        canvas: HtmlCanvasElement,
        zoom_canvas: Option<HtmlCanvasElement>,
        dpr: f32,
    ) -> Result<PictoView, JsValue> {
        console_error_panic_hook::set_once();

        let physical_width = canvas.width().max(1);
        let physical_height = canvas.height().max(1);

        let mut renderer =
            CanvasRenderer::new(canvas.clone()).map_err(|e| JsValue::from_str(&e.to_string()))?;
        renderer
            .init()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        renderer.resize(physical_width, physical_height, dpr);

        let zoom_panel = match zoom_canvas {
            Some(zoom_canvas) => {
                let mut panel = ZoomPanel::new(zoom_canvas.clone())
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
                panel.resize(zoom_canvas.width().max(1), zoom_canvas.height().max(1), dpr);
                Some(panel)
            }
            None => None,
        };

        let config = GridConfig {
            width: physical_width as f32 / dpr,
            height: physical_height as f32 / dpr,
            ..GridConfig::default()
        };
        let geometry = GridGeometry::new(&config, &GridDimensions::default());

        let state = Rc::new(RefCell::new(SharedState {
            dataset: None,
            geometry,
            cells: Vec::new(),
            cell_lookup: HashMap::new(),
            page_colors: PageColors::default(),
            interaction: InteractionState::new(),
            config,
            width: physical_width,
            height: physical_height,
            dpr,
            needs_render: true,
            needs_zoom_render: false,
            dirty_cells: Vec::new(),
            render_callback: None,
        }));

        // Shared tooltip element for hover feedback (optional)
        let tooltip: Option<HtmlElement> = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("tooltip"))
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());

        let mut closures: Vec<Closure<dyn FnMut(MouseEvent)>> = Vec::new();

        // Mouse move (hover highlight + tooltip)
        {
            let state = state.clone();
            let canvas_ref = canvas.clone();
            let tooltip = tooltip.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let rect = canvas_ref.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let y = event.client_y() as f32 - rect.top() as f32;
                Self::internal_mouse_move(&state, x, y);
                Self::update_hover_ui(&state, tooltip.as_ref(), event.client_x(), event.client_y());
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
                .ok();
            closures.push(closure);
        }

        // Mouse leave (clear hover + hide tooltip)
        {
            let state = state.clone();
            let tooltip = tooltip.clone();
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                Self::internal_mouse_leave(&state);
                if let Some(tooltip) = tooltip.as_ref() {
                    let _ = tooltip.style().set_property("display", "none");
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())
                .ok();
            closures.push(closure);
        }

        Ok(PictoView {
            state,
            renderer,
            zoom_panel,
            closures,
        })
    }
}

// ============================================================================
// Non-WASM32 Implementation (for testing/CLI)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl PictoView {
    /// Create a new viewer (non-wasm version for testing)
    pub fn new_test(width: u32, height: u32, dpr: f32) -> Self {
        let config = GridConfig {
            width: width as f32 / dpr,
            height: height as f32 / dpr,
            ..GridConfig::default()
        };
        let geometry = GridGeometry::new(&config, &crate::layout::GridDimensions::default());
        PictoView {
            dataset: None,
            geometry,
            cells: Vec::new(),
            cell_lookup: HashMap::new(),
            page_colors: PageColors::default(),
            interaction: InteractionState::new(),
            config,
            width,
            height,
            dpr,
            needs_render: true,
        }
    }

    /// Load pictogram CSV bytes and lay out the grid.
    pub fn load(&mut self, data: &[u8]) -> crate::error::Result<()> {
        let grid = build_grid(data, &self.config)?;
        self.dataset = Some(grid.dataset);
        self.geometry = grid.geometry;
        self.cells = grid.cells;
        self.cell_lookup = grid.cell_lookup;
        self.page_colors = grid.page_colors;
        self.interaction = InteractionState::new();
        self.needs_render = true;
        Ok(())
    }

    /// Load with a fixed color seed so page colors are reproducible.
    pub fn load_with_seed(&mut self, data: &[u8], seed: u64) -> crate::error::Result<()> {
        self.load(data)?;
        if let Some(dataset) = &self.dataset {
            self.page_colors = PageColorAssigner::with_seed(seed).assign(dataset.pages());
        }
        Ok(())
    }

    /// Switch layout mode, re-laying out any loaded dataset.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.config.layout = mode;
        if let Some(dataset) = self.dataset.take() {
            let rebuilt = Dataset::build(dataset.into_records(), mode);
            self.geometry = GridGeometry::new(&self.config, rebuilt.dims());
            let (cells, lookup) = render_list(&rebuilt);
            self.cells = cells;
            self.cell_lookup = lookup;
            self.dataset = Some(rebuilt);
            self.interaction = InteractionState::new();
        }
        self.needs_render = true;
    }

    /// Exact-word search; returns the repaint set.
    pub fn search(&mut self, text: &str) -> Repaint {
        let repaint = match &self.dataset {
            Some(dataset) => self.interaction.search(text, dataset),
            None => Repaint::none(),
        };
        self.mark_dirty(&repaint);
        repaint
    }

    /// Make the current search matches sticky.
    pub fn mark_matches(&mut self) -> Repaint {
        let repaint = self.interaction.mark_matches();
        self.mark_dirty(&repaint);
        repaint
    }

    /// Clear all highlight state.
    pub fn reset(&mut self) -> Repaint {
        let repaint = self.interaction.reset();
        self.mark_dirty(&repaint);
        repaint
    }

    /// Toggle the per-page color overlay.
    pub fn toggle_page_colors(&mut self) -> Repaint {
        let repaint = self.interaction.toggle_pages_overlay();
        self.mark_dirty(&repaint);
        repaint
    }

    /// Pointer moved to logical coordinates (x, y): enter the occupied
    /// cell underneath, or clear the hover when over background.
    pub fn hover(&mut self, x: f32, y: f32) -> Repaint {
        match hover_target(&self.geometry, self.dataset.as_ref(), x, y) {
            Some(cell) => self.interaction.hover_enter(cell),
            None => self.clear_hover(),
        }
    }

    /// Pointer left the canvas.
    pub fn clear_hover(&mut self) -> Repaint {
        match self.interaction.hovered() {
            Some(prev) => self.interaction.hover_leave(prev),
            None => Repaint::none(),
        }
    }

    /// The magnified neighborhood around the current zoom focus.
    pub fn zoom_view(&self) -> Option<ZoomSnapshot> {
        let dataset = self.dataset.as_ref()?;
        let focus = self.interaction.zoom_focus()?;
        Some(zoom_snapshot(
            focus,
            self.config.zoom_window,
            dataset,
            |cell| {
                resting_fill_of(
                    &self.interaction,
                    &self.cells,
                    &self.cell_lookup,
                    &self.page_colors,
                    cell,
                )
            },
        ))
    }

    /// Current fill of a cell, hover included.
    pub fn fill(&self, cell: CellId) -> CellFill {
        let page_color = self
            .cell_lookup
            .get(&cell)
            .and_then(|&idx| self.cells.get(idx))
            .and_then(|data| self.page_colors.get(data.page_idx));
        fill_for(self.interaction.highlight_for(cell), page_color)
    }

    /// Resting fill of a cell, hover excluded (what the zoom mirrors).
    pub fn resting_fill(&self, cell: CellId) -> CellFill {
        resting_fill_of(
            &self.interaction,
            &self.cells,
            &self.cell_lookup,
            &self.page_colors,
            cell,
        )
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn cells(&self) -> &[CellRenderData] {
        &self.cells
    }

    pub fn page_colors(&self) -> &PageColors {
        &self.page_colors
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    pub fn summary(&self) -> Option<DatasetSummary> {
        self.dataset.as_ref().map(Dataset::summary)
    }

    /// Records of the loaded dataset (empty before a load).
    pub fn records(&self) -> &[PictogramRecord] {
        self.dataset.as_ref().map_or(&[], Dataset::records)
    }

    fn mark_dirty(&mut self, repaint: &Repaint) {
        if matches!(repaint, Repaint::Full) {
            self.needs_render = true;
        }
    }
}
