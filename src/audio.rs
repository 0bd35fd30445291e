use crate::constants::*;
use anyhow::{anyhow, bail};
use geopulse_core::{
    midi_to_hz, ClockEvent, LeadStep, MixerChannel, MixerGains, PadChange, ScheduledEvent,
    Waveform,
};
use std::cell::RefCell;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// An `AudioContext` that has been resumed from a user gesture.
///
/// The sound graph can only be built from one of these, so nothing can be
/// triggered while output is still locked.
pub struct UnlockedAudio {
    ctx: web::AudioContext,
}

pub async fn unlock() -> anyhow::Result<UnlockedAudio> {
    let ctx = web::AudioContext::new().map_err(|e| anyhow!("AudioContext error: {:?}", e))?;
    let unlocked = UnlockedAudio { ctx };
    if let Err(e) = unlocked.resume().await {
        unlocked.close();
        return Err(e);
    }
    Ok(unlocked)
}

impl UnlockedAudio {
    async fn resume(&self) -> anyhow::Result<()> {
        let resumed = self
            .ctx
            .resume()
            .map_err(|e| anyhow!("AudioContext resume error: {:?}", e))?;
        JsFuture::from(resumed)
            .await
            .map_err(|e| anyhow!("AudioContext resume rejected: {:?}", e))?;
        if self.ctx.state() != web::AudioContextState::Running {
            bail!("audio output still locked ({:?})", self.ctx.state());
        }
        Ok(())
    }

    /// Release the context after a start that did not complete.
    pub fn close(&self) {
        if let Err(e) = self.ctx.close() {
            log::warn!("[audio] close error: {:?}", e);
        }
    }
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(audio_ctx)
        .map_err(|e| anyhow!("{} GainNode error: {:?}", label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

fn oscillator_type(waveform: Waveform) -> web::OscillatorType {
    match waveform {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Triangle => web::OscillatorType::Triangle,
    }
}

// Procedural stereo impulse response: xorshift noise under an exponential tail
fn build_reverb(audio_ctx: &web::AudioContext) -> anyhow::Result<web::ConvolverNode> {
    let reverb =
        web::ConvolverNode::new(audio_ctx).map_err(|e| anyhow!("ConvolverNode error: {:?}", e))?;
    reverb.set_normalize(true);
    let sr = audio_ctx.sample_rate();
    let len = (sr * REVERB_SECONDS) as u32;
    let ir = audio_ctx
        .create_buffer(2, len, sr)
        .map_err(|e| anyhow!("impulse buffer error: {:?}", e))?;
    let mut seed: u32 = 0x2F6E_2B1D;
    for ch in 0..2 {
        let mut buf: Vec<f32> = vec![0.0; len as usize];
        for (i, v) in buf.iter_mut().enumerate() {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let n = (seed as f32 / u32::MAX as f32) * 2.0 - 1.0;
            let t = i as f32 / sr;
            *v = n * (-t / REVERB_DECAY_TAU_SEC).exp();
        }
        _ = ir.copy_to_channel(&mut buf, ch);
    }
    reverb.set_buffer(Some(&ir));
    Ok(reverb)
}

// Channel gain feeding both the dry master bus and the shared reverb send
fn create_channel(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
    master: &web::GainNode,
    reverb_in: &web::GainNode,
) -> anyhow::Result<web::GainNode> {
    let g = create_gain(audio_ctx, value, label)?;
    _ = g.connect_with_audio_node(master);
    _ = g.connect_with_audio_node(reverb_in);
    Ok(g)
}

/// Monophonic lead: one oscillator that runs for the whole session behind an
/// envelope gain, so detune and shape can change between notes.
struct LeadVoice {
    osc: web::OscillatorNode,
    env: web::GainNode,
}

impl LeadVoice {
    fn new(audio_ctx: &web::AudioContext, channel: &web::GainNode) -> anyhow::Result<Self> {
        let osc = web::OscillatorNode::new(audio_ctx)
            .map_err(|e| anyhow!("OscillatorNode error: {:?}", e))?;
        osc.set_type(web::OscillatorType::Sine);
        let env = create_gain(audio_ctx, 0.0, "Lead envelope")?;
        _ = osc.connect_with_audio_node(&env);
        _ = env.connect_with_audio_node(channel);
        osc.start_with_when(audio_ctx.current_time())
            .map_err(|e| anyhow!("lead start error: {:?}", e))?;
        Ok(Self { osc, env })
    }
}

struct PadTone {
    osc: web::OscillatorNode,
    env: web::GainNode,
}

pub struct SoundGraph {
    ctx: web::AudioContext,
    master: web::GainNode,
    lead_gain: web::GainNode,
    pad_gain: web::GainNode,
    kick_gain: web::GainNode,
    lead: LeadVoice,
    pad: RefCell<Vec<PadTone>>,
}

impl SoundGraph {
    /// voice -> channel gain -> {master, reverb send -> reverb -> wet -> master} -> output
    pub fn build(unlocked: &UnlockedAudio, mixer: &MixerGains) -> anyhow::Result<Self> {
        let ctx = unlocked.ctx.clone();

        let master = create_gain(&ctx, mixer.master, "Master")?;
        _ = master.connect_with_audio_node(&ctx.destination());

        let reverb_in = create_gain(&ctx, REVERB_SEND, "Reverb in")?;
        let reverb = build_reverb(&ctx)?;
        let reverb_wet = create_gain(&ctx, REVERB_WET, "Reverb wet")?;
        _ = reverb_in.connect_with_audio_node(&reverb);
        _ = reverb.connect_with_audio_node(&reverb_wet);
        _ = reverb_wet.connect_with_audio_node(&master);

        let lead_gain = create_channel(&ctx, mixer.lead, "Lead", &master, &reverb_in)?;
        let pad_gain = create_channel(&ctx, mixer.pad, "Pad", &master, &reverb_in)?;
        let kick_gain = create_channel(&ctx, mixer.kick, "Kick", &master, &reverb_in)?;
        let lead = LeadVoice::new(&ctx, &lead_gain)?;

        log::info!("[audio] graph ready at {} Hz", ctx.sample_rate());
        Ok(Self {
            ctx,
            master,
            lead_gain,
            pad_gain,
            kick_gain,
            lead,
            pad: RefCell::new(Vec::new()),
        })
    }

    pub fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    pub fn set_channel_gain(&self, channel: MixerChannel, value: f32) {
        let node = match channel {
            MixerChannel::Master => &self.master,
            MixerChannel::Lead => &self.lead_gain,
            MixerChannel::Pad => &self.pad_gain,
            MixerChannel::Kick => &self.kick_gain,
        };
        node.gain().set_value(value);
    }

    pub fn play(&self, ev: &ScheduledEvent) {
        match &ev.event {
            ClockEvent::Kick => self.play_kick(ev.time_sec),
            ClockEvent::Lead(step) => self.play_lead(ev.time_sec, step),
            ClockEvent::Pad(change) => self.change_pad(ev.time_sec, change),
        }
    }

    fn play_kick(&self, t: f64) {
        let src = match web::OscillatorNode::new(&self.ctx) {
            Ok(s) => s,
            Err(e) => {
                log::error!("kick OscillatorNode error: {:?}", e);
                return;
            }
        };
        let env = match create_gain(&self.ctx, 0.0, "Kick envelope") {
            Ok(g) => g,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };
        let base = midi_to_hz(KICK_BASE_MIDI);
        src.set_type(web::OscillatorType::Sine);
        _ = src
            .frequency()
            .set_value_at_time(base * 2.0_f32.powf(KICK_PITCH_OCTAVES), t);
        _ = src
            .frequency()
            .exponential_ramp_to_value_at_time(base, t + KICK_PITCH_DECAY_SEC);
        _ = env.gain().set_value_at_time(KICK_LEVEL, t);
        _ = env
            .gain()
            .exponential_ramp_to_value_at_time(KICK_FLOOR, t + KICK_DECAY_SEC);
        _ = src.connect_with_audio_node(&env);
        _ = env.connect_with_audio_node(&self.kick_gain);
        _ = src.start_with_when(t);
        _ = src.stop_with_when(t + KICK_DECAY_SEC + 0.05);
    }

    fn play_lead(&self, t: f64, step: &LeadStep) {
        _ = self
            .lead
            .osc
            .detune()
            .set_value_at_time(step.detune_cents, t);
        if !step.trigger {
            return;
        }
        self.lead.osc.set_type(oscillator_type(step.waveform));
        _ = self
            .lead
            .osc
            .frequency()
            .set_value_at_time(step.frequency_hz, t);

        let g = self.lead.env.gain();
        let peak = step.velocity;
        let hold_end = t + step.duration_sec as f64;
        let attack_end = t + LEAD_ATTACK_SEC;
        let decay_end = (attack_end + LEAD_DECAY_SEC).min(hold_end.max(attack_end));
        let release_start = hold_end.max(decay_end);
        _ = g.cancel_scheduled_values(t);
        _ = g.set_value_at_time(0.0, t);
        _ = g.linear_ramp_to_value_at_time(peak, attack_end);
        _ = g.linear_ramp_to_value_at_time(peak * LEAD_SUSTAIN, decay_end);
        _ = g.set_value_at_time(peak * LEAD_SUSTAIN, release_start);
        _ = g.linear_ramp_to_value_at_time(0.0, release_start + LEAD_RELEASE_SEC);
    }

    fn change_pad(&self, t: f64, change: &PadChange) {
        let mut held = self.pad.borrow_mut();
        for tone in held.drain(..) {
            _ = tone.env.gain().cancel_scheduled_values(t);
            _ = tone.env.gain().set_target_at_time(0.0, t, PAD_RELEASE_TAU_SEC);
            _ = tone
                .osc
                .stop_with_when(t + PAD_RELEASE_TAU_SEC * PAD_TAIL_TAUS);
        }
        for midi in change.midi {
            match self.start_pad_tone(t, midi) {
                Ok(tone) => held.push(tone),
                Err(e) => log::error!("{e}"),
            }
        }
        log::debug!("[audio] pad chord {} {:?}", change.chord_index, change.midi);
    }

    fn start_pad_tone(&self, t: f64, midi: i32) -> anyhow::Result<PadTone> {
        let osc = web::OscillatorNode::new(&self.ctx)
            .map_err(|e| anyhow!("pad OscillatorNode error: {:?}", e))?;
        osc.set_type(web::OscillatorType::Sine);
        osc.frequency().set_value(midi_to_hz(midi as f32));
        let env = create_gain(&self.ctx, 0.0, "Pad envelope")?;
        _ = env.gain().set_value_at_time(0.0, t);
        _ = env
            .gain()
            .linear_ramp_to_value_at_time(PAD_TONE_LEVEL, t + PAD_ATTACK_SEC);
        _ = osc.connect_with_audio_node(&env);
        _ = env.connect_with_audio_node(&self.pad_gain);
        osc.start_with_when(t)
            .map_err(|e| anyhow!("pad start error: {:?}", e))?;
        Ok(PadTone { osc, env })
    }
}
