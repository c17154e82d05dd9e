use crate::config;
use log::{error, info};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::error::Error;

const SAMPLE_RATE: u32 = 44_100;

// Keep synthesized tones comfortably below clipping even when several sinks
// overlap.
const BASE_GAIN: f32 = 0.1;

// C-major scale, one octave up then back down. The light cycle walks this
// sequence one note per tick, wrapping; it is not reset between games.
const SCALE_FREQS: [f32; 16] = [
    261.63, // C4
    293.66, // D4
    329.63, // E4
    349.23, // F4
    392.00, // G4
    440.00, // A4
    493.88, // B4
    523.25, // C5
    523.25, // C5
    493.88, // B4
    440.00, // A4
    392.00, // G4
    349.23, // F4
    329.63, // E4
    293.66, // D4
    261.63, // C4
];

/// Everything the game ever asks the speaker for, keyed by event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// One step of the light cycle.
    TickStep,
    /// A scoring press; the cue depends on the light's point value.
    Hit(u32),
    /// A mistimed press or a press on a dead light.
    Miss,
    MenuMove,
    MenuSelect,
}

#[derive(Debug, Clone, Copy)]
enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    scale_step: usize,
    volume: f32,
}

impl AudioManager {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        info!("Initializing AudioManager...");
        let (_stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to get default audio output stream: {e}"))?;
        info!("Audio output stream obtained.");
        Ok(AudioManager {
            _stream,
            stream_handle,
            scale_step: 0,
            volume: config::get().volume,
        })
    }

    /// Fire-and-forget playback of one cue. Tick cues advance the pitch
    /// sequence; everything else maps to a fixed tone.
    pub fn play(&mut self, cue: SoundCue) {
        let samples = match cue {
            SoundCue::TickStep => {
                let freq = SCALE_FREQS[self.scale_step];
                self.scale_step = (self.scale_step + 1) % SCALE_FREQS.len();
                tone(freq, 60, Waveform::Sine)
            }
            SoundCue::Hit(1) => tone(250.0, 80, Waveform::Sine),
            SoundCue::Hit(2) => tone(350.0, 100, Waveform::Square),
            SoundCue::Hit(5) => tone(500.0, 120, Waveform::Sawtooth),
            SoundCue::Hit(_) => {
                // The big one gets a rising three-note arpeggio.
                let mut samples = tone(600.0, 80, Waveform::Triangle);
                samples.extend(tone(800.0, 80, Waveform::Triangle));
                samples.extend(tone(1000.0, 80, Waveform::Triangle));
                samples
            }
            SoundCue::Miss => tone(80.0, 250, Waveform::Sawtooth),
            SoundCue::MenuMove => tone(700.0, 30, Waveform::Square),
            SoundCue::MenuSelect => tone(880.0, 90, Waveform::Sine),
        };
        self.play_samples(samples);
    }

    fn play_samples(&self, samples: Vec<f32>) {
        match Sink::try_new(&self.stream_handle) {
            Ok(sink) => {
                sink.set_volume(self.volume.clamp(0.0, 2.0));
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                sink.detach();
            }
            Err(e) => error!("Failed to create sink for cue playback: {e}"),
        }
    }
}

/// Renders `ms` milliseconds of the given waveform, with a short fade-out so
/// tones do not click when they stop.
fn tone(freq: f32, ms: u32, wave: Waveform) -> Vec<f32> {
    let total = (SAMPLE_RATE * ms / 1000) as usize;
    let fade = (SAMPLE_RATE / 200) as usize; // 5ms
    let mut samples = Vec::with_capacity(total);
    for i in 0..total {
        let t = i as f32 / SAMPLE_RATE as f32;
        let phase = (t * freq).fract();
        let raw = match wave {
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
        };
        let remaining = total - i;
        let envelope = if remaining < fade {
            remaining as f32 / fade as f32
        } else {
            1.0
        };
        samples.push(raw * envelope * BASE_GAIN);
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_renders_the_requested_duration() {
        assert_eq!(tone(440.0, 100, Waveform::Sine).len(), 4_410);
        assert_eq!(tone(440.0, 1_000, Waveform::Square).len(), SAMPLE_RATE as usize);
    }

    #[test]
    fn tone_fades_out_instead_of_clicking() {
        let samples = tone(440.0, 60, Waveform::Sawtooth);
        let last = samples.last().copied().unwrap_or(1.0);
        assert!(last.abs() < 0.01, "final sample should be near silence, got {last}");
    }

    #[test]
    fn tone_stays_below_clipping() {
        for wave in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            let peak = tone(523.25, 80, wave)
                .iter()
                .fold(0.0f32, |acc, s| acc.max(s.abs()));
            assert!(peak <= BASE_GAIN + f32::EPSILON);
        }
    }

    #[test]
    fn scale_walks_up_to_c5_and_back_down() {
        assert_eq!(SCALE_FREQS.len(), 16);
        assert_eq!(SCALE_FREQS[0], SCALE_FREQS[15]);
        let peak = SCALE_FREQS.iter().cloned().fold(0.0f32, f32::max);
        assert_eq!(peak, SCALE_FREQS[7]);
        assert_eq!(peak, SCALE_FREQS[8]);
        // Strictly ascending to the peak, strictly descending after it.
        for i in 0..7 {
            assert!(SCALE_FREQS[i] < SCALE_FREQS[i + 1]);
        }
        for i in 8..15 {
            assert!(SCALE_FREQS[i] > SCALE_FREQS[i + 1]);
        }
    }
}
