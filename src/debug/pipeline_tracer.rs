// Pipeline Tracer - diagnostic trace points for the spectrum and palette pipelines
//
// Each stage logs a one-line summary when tracing is enabled, which makes it
// easy to see where a signal goes silent or a palette collapses.
//
// Usage:
//   - Enable with SONIC_TRACE=1 environment variable (or `enable()` at runtime)
//   - Traces appear in logs with [TRACE] prefix
//   - Each trace carries a sequence number and microsecond timestamp

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// Environment variable that switches tracing on
pub const TRACE_ENV_VAR: &str = "SONIC_TRACE";

static TRACING_ENABLED: AtomicBool = AtomicBool::new(false);

static TRACE_COUNTER: AtomicU64 = AtomicU64::new(0);

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Initialize pipeline tracing from SONIC_TRACE
pub fn init() {
    let enabled = std::env::var(TRACE_ENV_VAR)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    TRACING_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled {
        log::info!("[TRACE] Pipeline tracing ENABLED - set SONIC_TRACE=0 to disable");
    }
}

#[inline]
pub fn is_enabled() -> bool {
    TRACING_ENABLED.load(Ordering::Relaxed)
}

pub fn enable() {
    TRACING_ENABLED.store(true, Ordering::SeqCst);
    log::info!("[TRACE] Pipeline tracing enabled at runtime");
}

pub fn disable() {
    TRACING_ENABLED.store(false, Ordering::SeqCst);
    log::info!("[TRACE] Pipeline tracing disabled at runtime");
}

/// Pipeline stages for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Samples drained into the history
    SampleIngest,
    /// History copied through the Hann window
    Windowed,
    /// Real FFT completed
    Transformed,
    /// Bins reduced to band RMS
    BandsAggregated,
    /// Band levels smoothed
    LoudnessSmoothed,
    /// Initial centroids chosen
    Seeded,
    /// One Lloyd assignment/update pass
    LloydIteration,
    /// Palette extracted
    PaletteReady,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::SampleIngest => "SAMPLE_IN",
            PipelineStage::Windowed => "WINDOW",
            PipelineStage::Transformed => "FFT",
            PipelineStage::BandsAggregated => "BANDS",
            PipelineStage::LoudnessSmoothed => "LOUDNESS",
            PipelineStage::Seeded => "SEED",
            PipelineStage::LloydIteration => "LLOYD",
            PipelineStage::PaletteReady => "PALETTE",
        }
    }
}

fn timestamp_us() -> u64 {
    let start = START_TIME.get_or_init(Instant::now);
    start.elapsed().as_micros() as u64
}

/// Log a trace event at a pipeline stage
///
/// No-op unless tracing is enabled.
#[inline]
pub fn trace(stage: PipelineStage, message: &str) {
    if !is_enabled() {
        return;
    }

    let id = TRACE_COUNTER.fetch_add(1, Ordering::Relaxed);
    log::info!(
        "[TRACE] {:>10} #{:06} @{:>10}us | {}",
        stage.as_str(),
        id,
        timestamp_us(),
        message
    );
}

/// Log a trace event with formatted arguments
///
/// The message is only formatted when tracing is enabled.
#[macro_export]
macro_rules! trace_pipeline {
    ($stage:expr, $($arg:tt)*) => {
        if $crate::debug::pipeline_tracer::is_enabled() {
            $crate::debug::pipeline_tracer::trace($stage, &format!($($arg)*));
        }
    };
}

/// Trace samples drained from the handoff
pub fn trace_sample_ingest(samples: usize, dropped_total: u64) {
    trace_pipeline!(
        PipelineStage::SampleIngest,
        "samples={} dropped_total={}",
        samples,
        dropped_total
    );
}

/// Trace a completed transform with its one-sided energy
pub fn trace_transform(fft_size: usize, energy: f32) {
    trace_pipeline!(
        PipelineStage::Transformed,
        "n={} energy={:.4e}",
        fft_size,
        energy
    );
}

/// Trace band RMS values and the loudest band
pub fn trace_bands(rms: &[f32]) {
    if !is_enabled() {
        return;
    }
    let loudest = rms
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(band, _)| band);
    trace(
        PipelineStage::BandsAggregated,
        &format!("bands={} loudest={:?} rms={:.3?}", rms.len(), loudest, rms),
    );
}

/// Trace smoothed levels after an update
pub fn trace_loudness(levels: &[f32], dt: f32) {
    trace_pipeline!(
        PipelineStage::LoudnessSmoothed,
        "dt={:.4}s levels={:.2?}",
        dt,
        levels
    );
}

/// Trace the chosen seed indices
pub fn trace_seeded(points: usize, seeds: &[usize]) {
    trace_pipeline!(
        PipelineStage::Seeded,
        "points={} seeds={:?}",
        points,
        seeds
    );
}

/// Trace one Lloyd pass
pub fn trace_lloyd_iteration(iteration: usize, sizes: &[usize], empty: usize) {
    trace_pipeline!(
        PipelineStage::LloydIteration,
        "iteration={} sizes={:?} empty={}",
        iteration,
        sizes,
        empty
    );
}

/// Trace the finished palette
pub fn trace_palette_ready(colors: usize, iterations: usize, converged: bool) {
    trace_pipeline!(
        PipelineStage::PaletteReady,
        "colors={} iterations={} {}",
        colors,
        iterations,
        if converged { "CONVERGED" } else { "CAPPED" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the enabled flag is process-global
    #[test]
    fn test_enable_disable() {
        assert!(!is_enabled());
        enable();
        assert!(is_enabled());
        trace_bands(&[0.1, 0.5, 0.2]);
        trace_seeded(10, &[3, 7]);
        disable();
        assert!(!is_enabled());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(PipelineStage::Transformed.as_str(), "FFT");
        assert_eq!(PipelineStage::LloydIteration.as_str(), "LLOYD");
        assert_eq!(PipelineStage::PaletteReady.as_str(), "PALETTE");
    }
}
