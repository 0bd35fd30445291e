use crate::audio::SoundGraph;
use crate::constants::SCHEDULER_INTERVAL_MS;
use anyhow::anyhow;
use geopulse_core::{ClockConfig, InteractionState, MusicClock, ScheduledEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Musical clock loop, paced by a timer independently of the frame loop.
pub struct Scheduler {
    state: Rc<RefCell<InteractionState>>,
    graph: Rc<SoundGraph>,
    clock: MusicClock,
    rng: StdRng,
    events: Vec<ScheduledEvent>,
}

impl Scheduler {
    pub fn new(
        state: Rc<RefCell<InteractionState>>,
        graph: Rc<SoundGraph>,
        config: ClockConfig,
    ) -> anyhow::Result<Self> {
        config.validate().map_err(|e| anyhow!("clock config: {e}"))?;
        Ok(Self {
            state,
            graph,
            clock: MusicClock::new(config),
            rng: StdRng::from_entropy(),
            events: Vec::new(),
        })
    }

    fn start_clock(&mut self) {
        let bpm = self.state.borrow().bpm();
        self.clock.start(self.graph.current_time(), bpm);
        log::info!("[clock] started at {} bpm", bpm);
    }

    fn tick(&mut self) {
        let now = self.graph.current_time();
        self.events.clear();
        let res = {
            let mut state = self.state.borrow_mut();
            self.clock
                .tick(now, &mut state, &mut self.rng, &mut self.events)
        };
        match res {
            Ok(_) => {
                for ev in &self.events {
                    self.graph.play(ev);
                }
            }
            Err(e) => log::warn!("[clock] {e}"),
        }
    }
}

pub fn start_loop(scheduler: Rc<RefCell<Scheduler>>) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    {
        let mut s = scheduler.borrow_mut();
        s.start_clock();
        s.tick();
    }
    let closure = Closure::wrap(Box::new(move || {
        scheduler.borrow_mut().tick();
    }) as Box<dyn FnMut()>);
    window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            SCHEDULER_INTERVAL_MS,
        )
        .map_err(|e| anyhow!("setInterval error: {:?}", e))?;
    closure.forget();
    Ok(())
}
