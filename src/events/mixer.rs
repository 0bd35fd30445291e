use crate::audio::SoundGraph;
use geopulse_core::{InteractionState, MixerChannel};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Bind each `#vol-*` range input to its channel gain. Missing sliders are skipped.
pub fn wire_mixer_sliders(
    document: &web::Document,
    state: &Rc<RefCell<InteractionState>>,
    graph: &Rc<SoundGraph>,
) {
    for channel in MixerChannel::ALL {
        let Some(input) = document
            .get_element_by_id(channel.element_id())
            .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
        else {
            log::warn!("[mixer] missing #{}", channel.element_id());
            continue;
        };

        apply(channel, input.value_as_number(), state, graph);

        let state = state.clone();
        let graph = graph.clone();
        let slider = input.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
            apply(channel, slider.value_as_number(), &state, &graph);
        }) as Box<dyn FnMut(_)>);
        _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn apply(
    channel: MixerChannel,
    raw: f64,
    state: &Rc<RefCell<InteractionState>>,
    graph: &SoundGraph,
) {
    let value = state.borrow_mut().mixer.set(channel, raw as f32);
    graph.set_channel_gain(channel, value);
    log::debug!("[mixer] {:?} -> {:.2}", channel, value);
}
