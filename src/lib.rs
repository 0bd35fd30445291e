#![cfg(target_arch = "wasm32")]
use geopulse_core::gate::StartGate;
use geopulse_core::{ClockConfig, InteractionState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod geo;
mod input;
mod overlay;
mod scheduler;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::fit_canvas_to_viewport(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::fit_canvas_to_viewport(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("geopulse starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("vis")
        .ok_or_else(|| anyhow::anyhow!("missing #vis"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    wire_canvas_resize(&canvas);

    let state = Rc::new(RefCell::new(InteractionState::default()));
    events::wire_pointer_handlers(events::PointerWiring {
        canvas: canvas.clone(),
        state: state.clone(),
    });

    // Audio may only start from a user gesture; the gate click is that gesture.
    static GATE: StartGate = StartGate::new();
    dom::add_click_listener(&document, "gate", move || {
        if !GATE.try_begin() {
            return;
        }
        let state = state.clone();
        let canvas = canvas.clone();
        spawn_local(async move {
            if let Err(e) = start_session(state, canvas).await {
                log::error!("session error: {:?}", e);
                if let Some(doc) = dom::window_document() {
                    overlay::show_notice(&doc, &format!("Audio could not start: {e}"));
                }
                GATE.rearm();
            }
        });
    });

    Ok(())
}

async fn start_session(
    state: Rc<RefCell<InteractionState>>,
    canvas: web::HtmlCanvasElement,
) -> anyhow::Result<()> {
    let unlocked = audio::unlock().await?;
    log::info!("[gate] audio unlocked");
    match launch(&unlocked, state, canvas) {
        Ok(()) => Ok(()),
        Err(e) => {
            unlocked.close();
            Err(e)
        }
    }
}

// All fallible steps come first; nothing is wired until every one succeeds.
fn launch(
    unlocked: &audio::UnlockedAudio,
    state: Rc<RefCell<InteractionState>>,
    canvas: web::HtmlCanvasElement,
) -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let mixer = state.borrow().mixer;
    let graph = Rc::new(audio::SoundGraph::build(unlocked, &mixer)?);
    let sched = scheduler::Scheduler::new(state.clone(), graph.clone(), ClockConfig::default())?;
    let frame_ctx = frame::FrameContext::new(canvas, state.clone())?;
    scheduler::start_loop(Rc::new(RefCell::new(sched)))?;

    events::wire_mixer_sliders(&document, &state, &graph);
    overlay::hide_gate(&document);
    frame::start_loop(Rc::new(RefCell::new(frame_ctx)));
    log::info!("[gate] scheduler and renderer running");

    spawn_local(geo::resolve_and_publish(state));
    Ok(())
}
