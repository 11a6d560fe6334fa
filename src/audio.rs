//! Audio system using Web Audio API
//!
//! Procedurally generated cues - no sound files to preload.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Card picked
    CardFlip,
    /// Pair found
    Match,
    /// Wrong pair
    Mismatch,
    /// All pairs cleared
    Victory,
    /// Out of lives
    GameOver,
    /// Restart banner dismissed
    Whoosh,
    /// Fresh deck dealt
    CardSlide,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.8 }
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::CardFlip => self.play_flip(ctx, vol),
            SoundEffect::Match => self.play_match(ctx, vol),
            SoundEffect::Mismatch => self.play_mismatch(ctx, vol),
            SoundEffect::Victory => self.play_victory(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::Whoosh => self.play_whoosh(ctx, vol),
            SoundEffect::CardSlide => self.play_slide(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short rising tone per note, `step` seconds apart
    fn play_arpeggio(
        &self,
        ctx: &AudioContext,
        vol: f32,
        notes: &[f32],
        step: f64,
        osc_type: OscillatorType,
    ) {
        for (i, freq) in notes.iter().enumerate() {
            let delay = i as f64 * step;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + step.max(0.15))
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + step.max(0.15) + 0.05).ok();
            }
        }
    }

    /// Flip - quick tick
    fn play_flip(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Match - bright two-note ding
    fn play_match(&self, ctx: &AudioContext, vol: f32) {
        self.play_arpeggio(ctx, vol, &[660.0, 990.0], 0.08, OscillatorType::Sine);
    }

    /// Mismatch - low buzz
    fn play_mismatch(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(90.0, t + 0.3)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Victory - fanfare
    fn play_victory(&self, ctx: &AudioContext, vol: f32) {
        self.play_arpeggio(
            ctx,
            vol,
            &[500.0, 600.0, 700.0, 800.0, 1000.0],
            0.08,
            OscillatorType::Triangle,
        );
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        self.play_arpeggio(ctx, vol, &[400.0, 350.0, 300.0, 200.0], 0.2, OscillatorType::Sine);
    }

    /// Whoosh - falling sweep
    fn play_whoosh(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.01, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * 0.3, t + 0.1)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(600.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(200.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.5).ok();
    }

    /// Slide - rising swish as the deck is dealt
    fn play_slide(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(600.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }
}
