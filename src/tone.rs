#[cfg(feature = "audio")]
pub mod synth;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_secs: f32,
    pub waveform: Waveform,
}

impl Tone {
    pub const fn new(frequency_hz: f32, duration_secs: f32, waveform: Waveform) -> Self {
        Self {
            frequency_hz,
            duration_secs,
            waveform,
        }
    }
}

pub const HIT_TONE: Tone = Tone::new(660.0, 0.1, Waveform::Sine);
pub const MISS_TONE: Tone = Tone::new(220.0, 0.2, Waveform::Square);
pub const COUNTDOWN_TONE: Tone = Tone::new(523.0, 0.15, Waveform::Sine);
pub const GO_TONE: Tone = Tone::new(784.0, 0.2, Waveform::Sine);

/// Fire-and-forget sound output. Implementations swallow their own failures.
pub trait ToneSink {
    fn play(&self, tone: Tone);
}

/// Used when audio is muted or not compiled in
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentTones;

impl ToneSink for SilentTones {
    fn play(&self, _tone: Tone) {}
}

/// Keeps every requested tone; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingTones {
    played: Rc<RefCell<Vec<Tone>>>,
}

impl RecordingTones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Tone> {
        self.played.borrow().clone()
    }

    pub fn clear(&self) {
        self.played.borrow_mut().clear();
    }
}

impl ToneSink for RecordingTones {
    fn play(&self, tone: Tone) {
        self.played.borrow_mut().push(tone);
    }
}

/// Best available sink for this build
pub fn default_sink(muted: bool) -> Box<dyn ToneSink> {
    if muted {
        return Box::new(SilentTones);
    }
    #[cfg(feature = "audio")]
    {
        synth::init();
        Box::new(synth::SynthTones)
    }
    #[cfg(not(feature = "audio"))]
    {
        log::info!("built without the audio feature, cues are silent");
        Box::new(SilentTones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_pitches() {
        assert_eq!(HIT_TONE.frequency_hz, 660.0);
        assert_eq!(MISS_TONE.waveform, Waveform::Square);
        assert_eq!(COUNTDOWN_TONE.duration_secs, 0.15);
        assert_eq!(GO_TONE.frequency_hz, 784.0);
    }

    #[test]
    fn recording_clones_share_log() {
        let rec = RecordingTones::new();
        let sink: Box<dyn ToneSink> = Box::new(rec.clone());
        sink.play(HIT_TONE);
        sink.play(MISS_TONE);
        assert_eq!(rec.played(), vec![HIT_TONE, MISS_TONE]);
        rec.clear();
        assert!(rec.played().is_empty());
    }

    #[test]
    fn muted_sink_accepts_anything() {
        let sink = default_sink(true);
        sink.play(GO_TONE);
    }
}
