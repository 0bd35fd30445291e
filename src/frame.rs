use crate::constants::*;
use anyhow::anyhow;
use geopulse_core::{hud, mapping, InteractionState, VisualParams};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub state: Rc<RefCell<InteractionState>>,
    pub canvas: web::HtmlCanvasElement,
    pub ctx2d: web::CanvasRenderingContext2d,
}

impl FrameContext {
    pub fn new(
        canvas: web::HtmlCanvasElement,
        state: Rc<RefCell<InteractionState>>,
    ) -> anyhow::Result<Self> {
        let ctx2d = canvas
            .get_context("2d")
            .map_err(|e| anyhow!("getContext error: {:?}", e))?
            .ok_or_else(|| anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow!("{:?}", e))?;
        Ok(Self {
            state,
            canvas,
            ctx2d,
        })
    }

    pub fn frame(&mut self) {
        let (visual, lines, pointer) = {
            let st = self.state.borrow();
            (mapping::visual_params(&st), hud::hud_lines(&st), st.pointer())
        };
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;

        self.paint_scene(&visual, pointer.x as f64 * w, pointer.y as f64 * h, w, h);
        self.paint_hud(&lines, w);

        self.state.borrow_mut().decay_pulse();
    }

    fn paint_scene(&self, visual: &VisualParams, x: f64, y: f64, w: f64, h: f64) {
        let c = &self.ctx2d;
        c.set_fill_style_str(&visual.background.css());
        c.fill_rect(0.0, 0.0, w, h);

        c.set_fill_style_str(visual.pulse_color);
        c.begin_path();
        if let Err(e) = c.arc(x, y, visual.radius.max(0.0) as f64, 0.0, std::f64::consts::TAU) {
            log::error!("arc error: {:?}", e);
            return;
        }
        c.fill();
    }

    fn paint_hud(&self, lines: &[String], w: f64) {
        let c = &self.ctx2d;
        let x = w - HUD_WIDTH - HUD_MARGIN;
        let y = HUD_MARGIN;
        let height = HUD_PADDING * 2.0 + HUD_LINE_HEIGHT * lines.len() as f64;
        c.set_fill_style_str(HUD_BACKGROUND);
        c.fill_rect(x, y, HUD_WIDTH, height);

        c.set_fill_style_str(HUD_TEXT);
        c.set_font(HUD_FONT);
        c.set_text_baseline("top");
        for (i, line) in lines.iter().enumerate() {
            let ly = y + HUD_PADDING + HUD_LINE_HEIGHT * i as f64;
            _ = c.fill_text(line, x + HUD_PADDING, ly);
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
