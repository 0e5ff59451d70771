//! Browser platform
//!
//! Canvas lookup and DPR sizing, DOM listeners that feed the scene, and
//! `requestAnimationFrame` scheduling.

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::error::SetupError;
use crate::sim::InputEvent;

pub fn window() -> Result<web_sys::Window, SetupError> {
    web_sys::window().ok_or(SetupError::NoWindow)
}

pub fn document() -> Result<web_sys::Document, SetupError> {
    window()?.document().ok_or(SetupError::NoDocument)
}

/// Find the `<canvas>` with the given element id
pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, SetupError> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| SetupError::CanvasNotFound(id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| SetupError::NotACanvas(id.to_string()))
}

/// Page query string without the leading `?` (empty when unavailable)
pub fn query_string() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|s| s.trim_start_matches('?').to_string())
        .unwrap_or_default()
}

/// Milliseconds since the epoch
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current canvas size in CSS pixels
pub fn logical_size(canvas: &HtmlCanvasElement) -> Vec2 {
    Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32)
}

/// Size the canvas backing store for the device pixel ratio.
///
/// Returns the logical size and the physical width/height.
pub fn fit_canvas(canvas: &HtmlCanvasElement) -> (Vec2, u32, u32) {
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    let logical = logical_size(canvas);
    let width = ((logical.x as f64 * dpr) as u32).max(1);
    let height = ((logical.y as f64 * dpr) as u32).max(1);
    canvas.set_width(width);
    canvas.set_height(height);
    (logical, width, height)
}

/// Hide an element by id (loading indicator and friends)
pub fn hide_element(id: &str) {
    if let Some(el) = document().ok().and_then(|d| d.get_element_by_id(id)) {
        let _ = el.set_attribute("class", "hidden");
    }
}

/// Write `text` into an element by id, if it exists
pub fn set_text(id: &str, text: &str) {
    if let Some(el) = document().ok().and_then(|d| d.get_element_by_id(id)) {
        el.set_text_content(Some(text));
    }
}

/// Position of the first touch relative to the canvas
fn touch_position(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
    let touch = event.touches().get(0)?;
    let rect = canvas.get_bounding_client_rect();
    Some(Vec2::new(
        touch.client_x() as f32 - rect.left() as f32,
        touch.client_y() as f32 - rect.top() as f32,
    ))
}

fn mouse_position(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        event.client_x() as f32 - rect.left() as f32,
        event.client_y() as f32 - rect.top() as f32,
    )
}

/// Register pointer, touch and resize listeners that forward to `sink`
pub fn attach_input<F>(canvas: &HtmlCanvasElement, sink: F) -> Result<(), SetupError>
where
    F: Fn(InputEvent) + Clone + 'static,
{
    let window = window()?;

    // Mouse
    {
        let sink = sink.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            sink(InputEvent::PointerMove(mouse_position(&canvas_clone, &event)));
        });
        let _ = canvas
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    {
        let sink = sink.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            sink(InputEvent::PointerDown(mouse_position(&canvas_clone, &event)));
        });
        let _ = canvas
            .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    {
        let sink = sink.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            sink(InputEvent::PointerUp);
        });
        // On the window so releasing outside the canvas still counts
        let _ = window
            .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Touch
    {
        let sink = sink.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some(pos) = touch_position(&canvas_clone, &event) {
                sink(InputEvent::TouchStart(pos));
            }
        });
        let _ = canvas
            .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    {
        let sink = sink.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some(pos) = touch_position(&canvas_clone, &event) {
                sink(InputEvent::TouchMove(pos));
            }
        });
        let _ = canvas
            .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    {
        let sink = sink.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            sink(InputEvent::TouchEnd);
        });
        let _ = canvas
            .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Resize
    {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            sink(InputEvent::Resize(logical_size(&canvas_clone)));
        });
        let _ = window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    Ok(())
}

/// Schedule `callback` for the next animation frame
pub fn request_animation_frame(callback: impl FnOnce(f64) + 'static) {
    let Some(window) = web_sys::window() else {
        log::error!("No window; animation stopped");
        return;
    };
    let closure = Closure::once(callback);
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}
