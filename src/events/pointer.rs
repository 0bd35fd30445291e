use crate::input;
use geopulse_core::InteractionState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct PointerWiring {
    pub canvas: web::HtmlCanvasElement,
    pub state: Rc<RefCell<InteractionState>>,
}

/// Pointer drag on the canvas steers pitch (x) and density (y).
pub fn wire_pointer_handlers(w: PointerWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointer_release(&w, "pointerup");
    wire_pointer_release(&w, "pointerleave");
}

fn listen(
    canvas: &web::HtmlCanvasElement,
    kind: &str,
    closure: Closure<dyn FnMut(web::PointerEvent)>,
) {
    _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerdown(w: &PointerWiring) {
    let w2 = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let Some(uv) = input::pointer_canvas_uv(&ev, &w2.canvas) else {
            return;
        };
        w2.state.borrow_mut().begin_drag(uv.x, uv.y);
        _ = w2.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    listen(&w.canvas, "pointerdown", closure);
}

fn wire_pointermove(w: &PointerWiring) {
    let w2 = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if !w2.state.borrow().dragging {
            return;
        }
        if let Some(uv) = input::pointer_canvas_uv(&ev, &w2.canvas) {
            w2.state.borrow_mut().drag_to(uv.x, uv.y);
        }
    }) as Box<dyn FnMut(_)>);
    listen(&w.canvas, "pointermove", closure);
}

fn wire_pointer_release(w: &PointerWiring, kind: &str) {
    let w2 = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        w2.state.borrow_mut().end_drag();
        _ = w2.canvas.release_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    listen(&w.canvas, kind, closure);
}
