//! Mouse event handlers for `PictoView`.
//!
//! All methods here are `pub(crate)` helpers called from the closures wired
//! up in `mod.rs`; transitions run against the shared state and queue their
//! repaints for the next `render()`.

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use web_sys::HtmlElement;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use super::{hover_target, PictoView, SharedState};
#[cfg(target_arch = "wasm32")]
use crate::state::Repaint;

#[cfg(target_arch = "wasm32")]
impl PictoView {
    /// Run a highlight transition against the shared state, queue its
    /// repaint, and ask the host to schedule a frame.
    pub(crate) fn apply_transition(
        state: &Rc<RefCell<SharedState>>,
        transition: impl FnOnce(&mut SharedState) -> Repaint,
    ) {
        let callback = {
            let mut s = state.borrow_mut();
            let s = &mut *s;
            let repaint = transition(s);
            if repaint.is_none() {
                None
            } else {
                Self::queue_repaint(s, repaint);
                s.render_callback.clone()
            }
        };
        Self::invoke_render_callback(callback);
    }

    /// Fold a repaint into the dirty flags read by `render()`.
    pub(crate) fn queue_repaint(s: &mut SharedState, repaint: Repaint) {
        match repaint {
            Repaint::Full => {
                s.needs_render = true;
                s.dirty_cells.clear();
                s.needs_zoom_render = true;
            }
            Repaint::Cells(cells) => {
                if !cells.is_empty() {
                    s.dirty_cells.extend(cells);
                    s.needs_zoom_render = true;
                }
            }
        }
    }

    pub(crate) fn internal_mouse_move(state: &Rc<RefCell<SharedState>>, x: f32, y: f32) {
        Self::apply_transition(state, |s| {
            match hover_target(&s.geometry, s.dataset.as_ref(), x, y) {
                Some(cell) => s.interaction.hover_enter(cell),
                None => match s.interaction.hovered() {
                    Some(prev) => s.interaction.hover_leave(prev),
                    None => Repaint::none(),
                },
            }
        });
    }

    pub(crate) fn internal_mouse_leave(state: &Rc<RefCell<SharedState>>) {
        Self::apply_transition(state, |s| match s.interaction.hovered() {
            Some(prev) => s.interaction.hover_leave(prev),
            None => Repaint::none(),
        });
    }

    pub(crate) fn invoke_render_callback(callback: Option<Function>) {
        if let Some(callback) = callback {
            let _ = callback.call0(&JsValue::NULL);
        }
    }

    /// Position the tooltip next to the pointer while a cell is hovered.
    /// The tooltip text is `Word : <word>`.
    pub(crate) fn update_hover_ui(
        state: &Rc<RefCell<SharedState>>,
        tooltip: Option<&HtmlElement>,
        client_x: i32,
        client_y: i32,
    ) {
        let Some(tooltip) = tooltip else {
            return;
        };
        let word = {
            let s = state.borrow();
            s.interaction.hovered().and_then(|cell| {
                s.dataset
                    .as_ref()
                    .and_then(|d| d.record_at(cell))
                    .map(|record| record.word.clone())
            })
        };
        if let Some(word) = word {
            tooltip.set_text_content(Some(&format!("Word : {word}")));
            let _ = tooltip.style().set_property("display", "block");
            let _ = tooltip
                .style()
                .set_property("left", &format!("{}px", client_x + 12));
            let _ = tooltip
                .style()
                .set_property("top", &format!("{}px", client_y + 12));
        } else {
            let _ = tooltip.style().set_property("display", "none");
        }
    }
}
