use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use sonic_spectra::analysis::SpectrumFrame;
use sonic_spectra::audio::{sample_handoff, HandoffStats};
use sonic_spectra::debug::pipeline_tracer;
use sonic_spectra::error::{log_palette_error, log_spectral_error};
use sonic_spectra::fixtures::{self, SyntheticPattern, SyntheticSignal, SyntheticSpec};
use sonic_spectra::palette::{ColorPoints, ColorQuantizer, Rgba, Theme};
use sonic_spectra::{AppConfig, SpectrumAnalyzer};

#[derive(Parser, Debug)]
#[command(
    name = "sonic_cli",
    about = "Offline harness for the SonicSpectra loudness and palette engines"
)]
struct Cli {
    /// JSON configuration file (defaults are used when absent or invalid)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stream audio through the analyzer and print band loudness as JSON
    Spectrum {
        /// WAV file to analyze
        #[arg(long, conflicts_with = "synthetic")]
        wav: Option<PathBuf>,
        /// Synthetic pattern (sine, square, constant, white_noise, impulse_train)
        #[arg(long)]
        synthetic: Option<SyntheticPattern>,
        #[arg(long, default_value_t = 440.0)]
        frequency: f32,
        #[arg(long, default_value_t = 0.8)]
        amplitude: f32,
        /// Length of the synthetic signal in seconds
        #[arg(long, default_value_t = 1.0)]
        duration: f32,
        /// Analysis frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Print one JSON line per analysis frame
        #[arg(long)]
        every_frame: bool,
    },
    /// Extract the dominant colors of an image and print palette + theme as JSON
    Palette {
        #[arg(long)]
        image: PathBuf,
        /// Number of colors (overrides config)
        #[arg(long)]
        k: Option<usize>,
        /// Seed for the first centroid (overrides config)
        #[arg(long)]
        seed: Option<u64>,
        /// Resize the image to SIZE × SIZE before clustering (overrides config)
        #[arg(long)]
        size: Option<u32>,
    },
    /// Print the effective configuration as JSON
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    pipeline_tracer::init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Spectrum {
            wav,
            synthetic,
            frequency,
            amplitude,
            duration,
            fps,
            every_frame,
        } => {
            let source = match (wav, synthetic) {
                (Some(path), _) => SignalSource::Wav(path),
                (None, Some(pattern)) => SignalSource::Synthetic {
                    spec: SyntheticSpec::new(pattern, frequency, amplitude),
                    duration,
                },
                (None, None) => return Err(anyhow!("either --wav or --synthetic is required")),
            };
            run_spectrum(config, source, fps, every_frame)
        }
        Commands::Palette {
            image,
            k,
            seed,
            size,
        } => run_palette(config, &image, k, seed, size),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::from(0))
        }
    }
}

enum SignalSource {
    Wav(PathBuf),
    Synthetic { spec: SyntheticSpec, duration: f32 },
}

/// Interleaved samples plus their layout
struct LoadedSignal {
    label: String,
    samples: Vec<f32>,
    channels: usize,
}

fn load_signal(source: SignalSource, config: &mut AppConfig) -> Result<LoadedSignal> {
    match source {
        SignalSource::Wav(path) => {
            let clip = fixtures::read_wav(&path)?;
            config.spectrum.sample_rate = clip.sample_rate;
            config.spectrum.bit_depth = clip.bits_per_sample as u32;
            Ok(LoadedSignal {
                label: path.display().to_string(),
                samples: clip.samples,
                channels: clip.channels as usize,
            })
        }
        SignalSource::Synthetic { spec, duration } => {
            let frames = (duration.max(0.0) * config.spectrum.sample_rate as f32) as usize;
            let mut samples = vec![0.0; frames];
            SyntheticSignal::new(&spec, config.spectrum.sample_rate).fill(&mut samples);
            Ok(LoadedSignal {
                label: format!("{} {} Hz", spec.pattern, spec.frequency_hz),
                samples,
                channels: 1,
            })
        }
    }
}

#[derive(Serialize)]
struct SpectrumReport {
    source: String,
    sample_rate: u32,
    fps: u32,
    frames: u64,
    handoff: HandoffStats,
    last: SpectrumFrame,
}

fn run_spectrum(
    mut config: AppConfig,
    source: SignalSource,
    fps: u32,
    every_frame: bool,
) -> Result<ExitCode> {
    if fps == 0 {
        return Err(anyhow!("--fps must be greater than 0"));
    }
    let signal = load_signal(source, &mut config)?;
    config.validate().context("invalid configuration")?;

    let mut analyzer = SpectrumAnalyzer::new(&config.spectrum).map_err(|err| {
        log_spectral_error(&err, "sonic_cli spectrum");
        anyhow!(err)
    })?;
    let (mut tap, mut feed) =
        sample_handoff(config.audio.buffer_pool_size, config.audio.buffer_size);

    let frames_per_tick = (config.spectrum.sample_rate / fps).max(1) as usize;
    let dt = 1.0 / fps as f32;
    for batch in signal.samples.chunks(frames_per_tick * signal.channels) {
        tap.push_frames(batch, signal.channels);
        analyzer.ingest(&mut feed);
        analyzer.update(dt);
        if every_frame {
            println!("{}", serde_json::to_string(&analyzer.snapshot())?);
        }
    }

    let handoff = tap.stats();
    if handoff.dropped_samples > 0 {
        log::warn!(
            "[sonic_cli] {} samples dropped in {} batches; raise audio.buffer_pool_size",
            handoff.dropped_samples,
            handoff.dropped_batches
        );
    }

    let report = SpectrumReport {
        source: signal.label,
        sample_rate: config.spectrum.sample_rate,
        fps,
        frames: analyzer.frames_analyzed(),
        handoff,
        last: analyzer.snapshot(),
    };
    if !every_frame {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(ExitCode::from(0))
}

#[derive(Serialize)]
struct PaletteColor {
    hex: String,
    color: Rgba,
    population: usize,
}

#[derive(Serialize)]
struct PaletteReport {
    image: String,
    sample_size: u32,
    k: usize,
    first_seed: usize,
    iterations: usize,
    converged: bool,
    empty_cluster_events: usize,
    palette: Vec<PaletteColor>,
    theme: Theme,
}

fn run_palette(
    mut config: AppConfig,
    image_path: &Path,
    k: Option<usize>,
    seed: Option<u64>,
    size: Option<u32>,
) -> Result<ExitCode> {
    if let Some(k) = k {
        config.palette.cluster_count = k;
    }
    if seed.is_some() {
        config.palette.seed = seed;
    }
    if let Some(size) = size {
        config.palette.sample_size = size;
    }
    config.validate().context("invalid configuration")?;

    let decoded = image::open(image_path)
        .with_context(|| format!("failed to decode {}", image_path.display()))?;
    let sample_size = config.palette.sample_size;
    let resized = decoded
        .resize_exact(
            sample_size,
            sample_size,
            image::imageops::FilterType::Triangle,
        )
        .to_rgba8();
    let points = ColorPoints::from_image(&resized);

    let quantizer = ColorQuantizer::from_config(&config.palette)?;
    let mut rng = match config.palette.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let outcome = quantizer
        .quantize(points.as_slice(), &mut rng)
        .map_err(|err| {
            log_palette_error(&err, "sonic_cli palette");
            anyhow!(err)
        })?;

    let report = PaletteReport {
        image: image_path.display().to_string(),
        sample_size,
        k: quantizer.cluster_count(),
        first_seed: outcome.seeds[0],
        iterations: outcome.iterations,
        converged: outcome.converged,
        empty_cluster_events: outcome.empty_cluster_events,
        palette: outcome
            .palette
            .entries()
            .iter()
            .map(|entry| PaletteColor {
                hex: entry.color.rgb().to_hex(),
                color: entry.color,
                population: entry.population,
            })
            .collect(),
        theme: Theme::from_palette(&outcome.palette),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::from(0))
}
