use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) -> bool {
    let Some(el) = document.get_element_by_id(element_id) else {
        log::warn!("missing #{element_id}");
        return false;
    };
    let closure =
        wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
    true
}

/// Match the canvas drawing surface to the viewport.
pub fn fit_canvas_to_viewport(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        canvas.set_width((width as u32).max(1));
        canvas.set_height((height as u32).max(1));
    }
}

/// Best-effort readable text for a thrown JS value.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
