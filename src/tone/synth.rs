use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;
use log::{error, info, warn};
use once_cell::sync::Lazy;

use super::{Tone, ToneSink, Waveform};

const START_GAIN: f32 = 0.1;
const END_GAIN: f32 = 0.0001;

// None only when the audio thread could not be spawned. A device failure on that
// thread closes the channel instead, and later sends are dropped.
static ENGINE: Lazy<Option<Mutex<Sender<Tone>>>> = Lazy::new(|| spawn_engine(open_stream));

/// Starts the audio thread ahead of the first cue. Never waits for the device.
pub fn init() {
    Lazy::force(&ENGINE);
}

/// Tone sink backed by the process-wide output stream
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthTones;

impl ToneSink for SynthTones {
    fn play(&self, tone: Tone) {
        if let Some(sender) = ENGINE.as_ref() {
            if let Ok(tx) = sender.lock() {
                let _ = tx.send(tone);
            }
        }
    }
}

fn spawn_engine<S, F>(open: F) -> Option<Mutex<Sender<Tone>>>
where
    F: FnOnce(Receiver<Tone>) -> Result<S, String> + Send + 'static,
    S: 'static,
{
    let (tone_tx, tone_rx) = channel();

    // cpal streams are not Send on every host, so the stream lives and dies on this thread
    let spawned = thread::Builder::new()
        .name("thump-audio".into())
        .spawn(move || match open(tone_rx) {
            Ok(stream) => {
                let _stream = stream;
                loop {
                    thread::park();
                }
            }
            Err(e) => warn!("audio unavailable, continuing without sound: {}", e),
        });

    match spawned {
        Ok(_) => Some(Mutex::new(tone_tx)),
        Err(e) => {
            warn!("audio thread could not start: {}", e);
            None
        }
    }
}

fn open_stream(tone_rx: Receiver<Tone>) -> Result<cpal::Stream, String> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| "no audio output device".to_string())?;
    let supported = device
        .default_output_config()
        .map_err(|e| e.to_string())?;
    let config: StreamConfig = supported.into();

    let sample_rate = config.sample_rate.0 as f32;
    let channels = (config.channels as usize).max(1);
    let mut voices: Vec<Voice> = Vec::new();

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for tone in tone_rx.try_iter() {
                    voices.push(Voice::new(tone, sample_rate));
                }
                for frame in data.chunks_mut(channels) {
                    let mut mixed = 0.0f32;
                    for voice in voices.iter_mut() {
                        mixed += voice.next_sample();
                    }
                    for out in frame.iter_mut() {
                        *out = mixed.clamp(-1.0, 1.0);
                    }
                }
                voices.retain(|v| !v.finished());
            },
            |err| error!("audio stream error: {}", err),
            None,
        )
        .map_err(|e| e.to_string())?;
    stream.play().map_err(|e| e.to_string())?;

    info!(
        "audio engine initialized ({} Hz, {} ch)",
        sample_rate, channels
    );
    Ok(stream)
}

/// One sounding tone with an exponential gain decay
struct Voice {
    waveform: Waveform,
    phase: f32,
    phase_step: f32,
    sample: u32,
    total: u32,
}

impl Voice {
    fn new(tone: Tone, sample_rate: f32) -> Self {
        Self {
            waveform: tone.waveform,
            phase: 0.0,
            phase_step: tone.frequency_hz / sample_rate,
            sample: 0,
            total: (tone.duration_secs * sample_rate).max(1.0) as u32,
        }
    }

    fn finished(&self) -> bool {
        self.sample >= self.total
    }

    fn next_sample(&mut self) -> f32 {
        if self.finished() {
            return 0.0;
        }
        let progress = self.sample as f32 / self.total as f32;
        let gain = START_GAIN * (END_GAIN / START_GAIN).powf(progress);
        let value = oscillate(self.waveform, self.phase) * gain;
        self.phase = (self.phase + self.phase_step).fract();
        self.sample += 1;
        value
    }
}

fn oscillate(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => 2.0 * phase - 1.0,
        Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::{HIT_TONE, MISS_TONE};

    #[test]
    fn voice_decays_and_finishes() {
        let mut v = Voice::new(Tone::new(440.0, 0.5, Waveform::Square), 20.0);
        assert_eq!(v.total, 10);
        let first = v.next_sample().abs();
        assert!((first - START_GAIN).abs() < 1e-6);
        for _ in 0..9 {
            v.next_sample();
        }
        assert!(v.finished());
        assert_eq!(v.next_sample(), 0.0);
    }

    #[test]
    fn engine_hands_back_a_sender_before_the_device_opens() {
        let (gate_tx, gate_rx) = channel::<()>();
        let (seen_tx, seen_rx) = channel();
        let engine = spawn_engine(move |tones: Receiver<Tone>| {
            // device open stalls until the test releases it
            gate_rx.recv().map_err(|e| e.to_string())?;
            let _ = seen_tx.send(tones.recv().map_err(|e| e.to_string())?);
            Ok(())
        })
        .unwrap();

        engine.lock().unwrap().send(HIT_TONE).unwrap();
        gate_tx.send(()).unwrap();
        assert_eq!(
            seen_rx.recv_timeout(std::time::Duration::from_secs(5)),
            Ok(HIT_TONE)
        );
    }

    #[test]
    fn failed_device_leaves_play_harmless() {
        let engine = spawn_engine(|_tones: Receiver<Tone>| Err::<(), _>("no device".to_string()))
            .unwrap();
        let tx = engine.lock().unwrap();
        let give_up = std::time::Instant::now() + std::time::Duration::from_secs(5);
        // once the audio thread drops the receiver every send fails; play() discards the error
        while tx.send(MISS_TONE).is_ok() {
            assert!(std::time::Instant::now() < give_up, "receiver never dropped");
            std::thread::yield_now();
        }
    }

    #[test]
    fn waveforms_stay_in_range() {
        for wf in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            for i in 0..100 {
                let s = oscillate(wf, i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&s));
            }
        }
    }
}
