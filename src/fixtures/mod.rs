//! Deterministic signal sources for the CLI and tests.
//!
//! Synthetic generators produce reproducible mono PCM (sine, square,
//! constant, white noise, impulse train); the WAV helpers load and write
//! PCM files through `hound` so recorded material can be pushed through the
//! same pipeline.

use std::f32::consts::PI;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Seed used by noise generators unless overridden
pub const DEFAULT_NOISE_SEED: u64 = 0x5A5A_FFF0;

/// Supported deterministic waveform patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticPattern {
    Sine,
    Square,
    Constant,
    WhiteNoise,
    ImpulseTrain,
}

impl SyntheticPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntheticPattern::Sine => "sine",
            SyntheticPattern::Square => "square",
            SyntheticPattern::Constant => "constant",
            SyntheticPattern::WhiteNoise => "white_noise",
            SyntheticPattern::ImpulseTrain => "impulse_train",
        }
    }
}

impl fmt::Display for SyntheticPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyntheticPattern {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "sine" => Ok(SyntheticPattern::Sine),
            "square" => Ok(SyntheticPattern::Square),
            "constant" | "dc" => Ok(SyntheticPattern::Constant),
            "white_noise" | "noise" => Ok(SyntheticPattern::WhiteNoise),
            "impulse_train" | "impulse" => Ok(SyntheticPattern::ImpulseTrain),
            other => Err(format!(
                "unknown pattern '{}' (expected sine, square, constant, white_noise, impulse_train)",
                other
            )),
        }
    }
}

/// Configuration for a synthetic signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSpec {
    pub pattern: SyntheticPattern,
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl SyntheticSpec {
    pub fn new(pattern: SyntheticPattern, frequency_hz: f32, amplitude: f32) -> Self {
        Self {
            pattern,
            frequency_hz,
            amplitude,
            seed: DEFAULT_NOISE_SEED,
        }
    }

    pub fn sine(frequency_hz: f32, amplitude: f32) -> Self {
        Self::new(SyntheticPattern::Sine, frequency_hz, amplitude)
    }
}

fn default_frequency_hz() -> f32 {
    440.0
}

fn default_amplitude() -> f32 {
    0.8
}

fn default_seed() -> u64 {
    DEFAULT_NOISE_SEED
}

/// Endless mono sample stream for a [`SyntheticSpec`].
pub struct SyntheticSignal {
    pattern: SyntheticPattern,
    amplitude: f32,
    phase_step: f32,
    phase: f32,
    impulse_interval: usize,
    frames_emitted: usize,
    rng: StdRng,
}

impl SyntheticSignal {
    pub fn new(spec: &SyntheticSpec, sample_rate: u32) -> Self {
        let frequency_hz = spec.frequency_hz.max(1.0);
        let impulse_interval = (sample_rate as f32 / frequency_hz).max(1.0) as usize;
        Self {
            pattern: spec.pattern,
            amplitude: spec.amplitude,
            phase_step: frequency_hz / sample_rate.max(1) as f32,
            phase: 0.0,
            impulse_interval: impulse_interval.max(1),
            frames_emitted: 0,
            rng: StdRng::seed_from_u64(spec.seed),
        }
    }

    fn advance_phase(&mut self) {
        // Steps above one cycle per sample (frequency > sample rate) alias
        self.phase = (self.phase + self.phase_step).fract();
    }

    /// Overwrite `buffer` with the next samples
    pub fn fill(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    fn next_sample(&mut self) -> f32 {
        let value = match self.pattern {
            SyntheticPattern::Sine => (2.0 * PI * self.phase).sin() * self.amplitude,
            SyntheticPattern::Square => {
                if self.phase < 0.5 {
                    self.amplitude
                } else {
                    -self.amplitude
                }
            }
            SyntheticPattern::Constant => self.amplitude,
            SyntheticPattern::WhiteNoise => {
                if self.amplitude > 0.0 {
                    self.rng.gen_range(-self.amplitude..self.amplitude)
                } else {
                    0.0
                }
            }
            SyntheticPattern::ImpulseTrain => {
                if self.frames_emitted % self.impulse_interval == 0 {
                    self.amplitude
                } else {
                    0.0
                }
            }
        };
        self.advance_phase();
        self.frames_emitted += 1;
        value
    }
}

impl Iterator for SyntheticSignal {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        Some(self.next_sample())
    }
}

/// Generate `frames` mono samples of a synthetic signal
pub fn generate(spec: &SyntheticSpec, sample_rate: u32, frames: usize) -> Vec<f32> {
    SyntheticSignal::new(spec, sample_rate).take(frames).collect()
}

/// Decoded WAV file, samples normalized to [-1, 1] and interleaved
#[derive(Debug, Clone, PartialEq)]
pub struct WavClip {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl WavClip {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Channel 0 of every frame
    pub fn left_channel(&self) -> Vec<f32> {
        self.samples
            .chunks_exact(self.channels.max(1) as usize)
            .map(|frame| frame[0])
            .collect()
    }

    pub fn duration_secs(&self) -> f32 {
        self.frames() as f32 / self.sample_rate.max(1) as f32
    }
}

/// Load a PCM WAV file (16/24/32-bit integer or 32-bit float)
pub fn read_wav(path: &Path) -> Result<WavClip> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        bail!("{} has zero channels", path.display());
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .with_context(|| format!("error reading {}", path.display()))?,
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|sample| sample.map(|v| v as f32 / i16::MAX as f32))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .with_context(|| format!("error reading {}", path.display()))?,
            24 | 32 => {
                let max = ((1i64 << (spec.bits_per_sample - 1)) - 1) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|v| v as f32 / max))
                    .collect::<std::result::Result<Vec<f32>, _>>()
                    .with_context(|| format!("error reading {}", path.display()))?
            }
            bits => {
                return Err(anyhow!(
                    "unsupported bits_per_sample={} for {}",
                    bits,
                    path.display()
                ))
            }
        },
    };

    log::info!(
        "[Fixtures] Loaded {} ({} ch, {} Hz, {} bit, {} frames)",
        path.display(),
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        samples.len() / spec.channels as usize
    );

    Ok(WavClip {
        samples,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
    })
}

/// Write mono samples as a 32-bit float WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer
        .finalize()
        .with_context(|| format!("failed to finalize {}", path.display()))?;
    Ok(())
}
