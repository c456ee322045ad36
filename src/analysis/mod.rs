// Analysis module - spectral loudness pipeline
//
// SpectrumAnalyzer owns every piece of per-stream state and runs one analysis
// cycle per rendered frame:
//
//   SampleHistory → HannWindow → real_transform → BandAggregator → LoudnessSmoother
//
// Samples arrive either directly (`push_*`) or through a `SampleFeed` drained
// from the audio callback's `SampleTap`. Nothing here is shared: callers that
// analyze several streams create several analyzers.

use serde::Serialize;

use crate::audio::SampleFeed;
use crate::config::SpectrumConfig;
use crate::debug::pipeline_tracer;
use crate::error::{log_spectral_error, SpectralError};

pub mod bands;
pub mod fft;
pub mod history;
pub mod smoother;
pub mod window;

pub use bands::{BandAggregator, DEFAULT_BAND_BOUNDARIES_HZ};
pub use fft::{complex_transform, real_transform, FrequencyBins, TransformDirection};
pub use history::SampleHistory;
pub use smoother::{full_scale_for_bit_depth, rms_to_db, LoudnessSmoother};
pub use window::{hann_window, HannWindow, HANN_ENERGY_CORRECTION};

/// Emit a debug summary every N analyzed frames
const LOG_EVERY_N_FRAMES: u64 = 120;

/// Serializable result of the latest analysis cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumFrame {
    /// Number of completed analysis cycles
    pub frame: u64,
    /// Smoothed loudness per band (dB)
    pub levels: Vec<f32>,
    /// Unsmoothed band RMS from the latest transform
    pub rms: Vec<f32>,
    /// Band edges the levels refer to
    pub band_boundaries_hz: Vec<f32>,
}

/// Caller-owned spectral analyzer
pub struct SpectrumAnalyzer {
    history: SampleHistory,
    window: HannWindow,
    aggregator: BandAggregator,
    smoother: LoudnessSmoother,
    /// Windowed samples, transformed in place into the packed spectrum
    spectrum: Vec<f32>,
    rms: Vec<f32>,
    frames_analyzed: u64,
}

impl SpectrumAnalyzer {
    /// Build an analyzer from configuration
    ///
    /// # Errors
    /// Any `SpectralError` raised while validating the transform length,
    /// sample rate, band layout, smoothing factor or full-scale reference.
    pub fn new(config: &SpectrumConfig) -> Result<Self, SpectralError> {
        let aggregator =
            BandAggregator::new(&config.band_boundaries_hz, config.sample_rate, config.fft_size)?
                .with_amplitude_correction(config.amplitude_correction);
        let smoother = LoudnessSmoother::new(
            aggregator.band_count(),
            config.smoothing_factor,
            config.full_scale(),
        )?
        .with_floor(config.level_floor);

        log::info!(
            "[SpectrumAnalyzer] n={} sample_rate={} bands={} full_scale={:.2}",
            config.fft_size,
            config.sample_rate,
            aggregator.band_count(),
            smoother.full_scale()
        );

        Ok(Self {
            history: SampleHistory::new(config.fft_size),
            window: HannWindow::new(config.fft_size),
            rms: vec![0.0; aggregator.band_count()],
            spectrum: vec![0.0; config.fft_size],
            aggregator,
            smoother,
            frames_analyzed: 0,
        })
    }

    pub fn push_sample(&mut self, sample: f32) {
        self.history.push(sample);
    }

    pub fn push_samples(&mut self, samples: &[f32]) {
        self.history.extend_from_slice(samples);
    }

    /// Append channel 0 of an interleaved frame batch
    pub fn push_frames(&mut self, interleaved: &[f32], channels: usize) {
        self.history.push_frames(interleaved, channels);
    }

    /// Drain every pending buffer from the handoff into the history
    ///
    /// # Returns
    /// Number of samples ingested
    pub fn ingest(&mut self, feed: &mut SampleFeed) -> usize {
        let history = &mut self.history;
        let ingested = feed.drain(|samples| history.extend_from_slice(samples));
        if ingested > 0 {
            pipeline_tracer::trace_sample_ingest(ingested, feed.stats().dropped_samples);
        }
        ingested
    }

    /// Run one analysis cycle and blend it into the smoothed levels
    ///
    /// # Arguments
    /// * `dt` - Seconds since the previous update
    ///
    /// # Returns
    /// Smoothed loudness per band. Internal failures are logged and leave the
    /// previous levels in place.
    pub fn update(&mut self, dt: f32) -> &[f32] {
        if let Err(err) = self.analyze() {
            log_spectral_error(&err, "SpectrumAnalyzer::update");
            return self.smoother.levels();
        }

        if let Err(err) = self.smoother.update(&self.rms, dt) {
            log_spectral_error(&err, "SpectrumAnalyzer::update");
            return self.smoother.levels();
        }

        self.frames_analyzed += 1;
        let levels = self.smoother.levels();
        pipeline_tracer::trace_loudness(levels, dt);
        if self.frames_analyzed % LOG_EVERY_N_FRAMES == 0 {
            tracing::debug!(
                "[SpectrumAnalyzer] frame={} levels={:.1?}",
                self.frames_analyzed,
                levels
            );
        }
        levels
    }

    fn analyze(&mut self) -> Result<(), SpectralError> {
        let n = self.spectrum.len();
        self.history.windowed_into(&self.window, &mut self.spectrum);
        crate::trace_pipeline!(
            pipeline_tracer::PipelineStage::Windowed,
            "n={} latest={:.4}",
            n,
            self.history.latest()
        );

        real_transform(&mut self.spectrum, n, TransformDirection::Forward)?;
        let bins = FrequencyBins::new(&self.spectrum);
        if pipeline_tracer::is_enabled() {
            pipeline_tracer::trace_transform(n, bins.total_energy());
        }

        self.aggregator.aggregate(&bins, &mut self.rms)?;
        pipeline_tracer::trace_bands(&self.rms);
        Ok(())
    }

    /// Smoothed loudness per band (dB)
    pub fn levels(&self) -> &[f32] {
        self.smoother.levels()
    }

    /// Band RMS from the latest cycle
    pub fn rms(&self) -> &[f32] {
        &self.rms
    }

    /// Packed spectrum from the latest cycle
    pub fn spectrum(&self) -> FrequencyBins<'_> {
        FrequencyBins::new(&self.spectrum)
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    pub fn aggregator(&self) -> &BandAggregator {
        &self.aggregator
    }

    pub fn band_count(&self) -> usize {
        self.aggregator.band_count()
    }

    pub fn frames_analyzed(&self) -> u64 {
        self.frames_analyzed
    }

    pub fn snapshot(&self) -> SpectrumFrame {
        SpectrumFrame {
            frame: self.frames_analyzed,
            levels: self.levels().to_vec(),
            rms: self.rms.clone(),
            band_boundaries_hz: self.aggregator.boundaries_hz().to_vec(),
        }
    }

    /// Clear history, spectrum and smoothed levels (new track)
    pub fn reset(&mut self) {
        self.history.reset();
        self.smoother.reset();
        self.spectrum.fill(0.0);
        self.rms.fill(0.0);
        self.frames_analyzed = 0;
        log::info!("[SpectrumAnalyzer] Reset");
    }
}
