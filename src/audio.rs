//! Audio cues
//!
//! The simulation only emits events. This module maps them to short
//! procedurally generated tones and hands those to an [`AudioSink`]. Sinks are
//! fire-and-forget: a sink that cannot play simply drops the cue, and a
//! muted manager never reaches the sink at all.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// A single tone: what a sink is asked to play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub frequency: f32,
    pub duration_ms: u32,
    pub waveform: Waveform,
    /// Linear gain (0.0 - 1.0)
    pub gain: f32,
}

impl Cue {
    /// Same tone at `volume` times the gain
    pub fn scaled(self, volume: f32) -> Self {
        Self {
            gain: self.gain * volume.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Hit traffic - low buzz
    Crash,
    /// Coin collected - bright blip
    CoinCollect,
    /// Parked in the spot
    Parked,
    /// Level objective complete
    LevelComplete,
}

impl SoundEffect {
    pub fn cue(&self) -> Cue {
        match self {
            SoundEffect::Crash => Cue {
                frequency: 100.0,
                duration_ms: 260,
                waveform: Waveform::Sawtooth,
                gain: 0.08,
            },
            SoundEffect::CoinCollect => Cue {
                frequency: 1046.0,
                duration_ms: 100,
                waveform: Waveform::Square,
                gain: 0.05,
            },
            SoundEffect::Parked => Cue {
                frequency: 1320.0,
                duration_ms: 180,
                waveform: Waveform::Square,
                gain: 0.06,
            },
            SoundEffect::LevelComplete => Cue {
                frequency: 1244.0,
                duration_ms: 180,
                waveform: Waveform::Sine,
                gain: 0.06,
            },
        }
    }

    /// The effect for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Crashed => Some(SoundEffect::Crash),
            GameEvent::CoinCollected => Some(SoundEffect::CoinCollect),
            GameEvent::Parked => Some(SoundEffect::Parked),
            GameEvent::LevelComplete { .. } => Some(SoundEffect::LevelComplete),
            GameEvent::BadgeEarned(_) => None,
        }
    }
}

/// Something that can play a cue
pub trait AudioSink {
    fn play(&mut self, cue: &Cue);
}

/// Sink that logs cues instead of playing them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: &Cue) {
        log::debug!(
            "cue {:?} {}Hz {}ms gain={:.3}",
            cue.waveform,
            cue.frequency,
            cue.duration_ms,
            cue.gain
        );
    }
}

/// Volume and mute handling in front of a sink
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Take volume and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(&effect.cue().scaled(vol));
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Cue, Waveform};

    /// Web Audio backend - one oscillator per cue
    pub struct WebAudio {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn create_osc(
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
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: &Cue) {
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let osc_type = match cue.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = Self::create_osc(ctx, cue.frequency, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value(cue.gain);
            osc.start().ok();
            osc.stop_with_when(t + cue.duration_ms as f64 / 1000.0).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<Cue>);

    impl AudioSink for Recorder {
        fn play(&mut self, cue: &Cue) {
            self.0.push(*cue);
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(SoundEffect::for_event(&GameEvent::Crashed), Some(SoundEffect::Crash));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LevelComplete {
                level: 1,
                description: "x"
            }),
            Some(SoundEffect::LevelComplete)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BadgeEarned(crate::sim::Badge::Speed12)),
            None
        );
    }

    #[test]
    fn test_volume_scaling() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(1.0);
        audio.play(SoundEffect::Crash);
        let cue = audio.sink().0[0];
        assert_eq!(cue.frequency, 100.0);
        assert!((cue.gain - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.apply_settings(&Settings {
            muted: true,
            ..Settings::default()
        });
        audio.play(SoundEffect::CoinCollect);
        assert!(audio.sink().0.is_empty());
    }
}
