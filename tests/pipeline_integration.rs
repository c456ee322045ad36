use sonic_spectra::analysis::{real_transform, FrequencyBins, TransformDirection};
use sonic_spectra::fixtures::{generate, SyntheticPattern, SyntheticSpec};
use sonic_spectra::palette::{ColorPoints, ColorQuantizer, Rgb, Theme};
use sonic_spectra::{sample_handoff, AppConfig, SpectrumAnalyzer, SpectrumConfig};

fn loudest_band(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(band, _)| band)
        .unwrap()
}

#[test]
fn test_threaded_tap_feeds_analyzer() {
    let config = AppConfig::default();
    let mut analyzer = SpectrumAnalyzer::new(&config.spectrum).unwrap();
    let (mut tap, mut feed) =
        sample_handoff(config.audio.buffer_pool_size, config.audio.buffer_size);

    // Stereo 200 Hz tone on the left channel, silence on the right
    let left = generate(&SyntheticSpec::sine(200.0, 0.7), 44_100, 44_100 / 2);
    let stereo: Vec<f32> = left.iter().flat_map(|&s| [s, 0.0]).collect();

    let producer = std::thread::spawn(move || {
        for batch in stereo.chunks(512 * 2) {
            let mut offset = 0;
            let frames = batch.len() / 2;
            while offset < frames {
                offset += tap.push_frames(&batch[offset * 2..], 2);
                std::thread::yield_now();
            }
        }
        tap.stats()
    });

    let mut ingested = 0;
    while ingested < left.len() {
        let drained = analyzer.ingest(&mut feed);
        if drained == 0 {
            std::thread::yield_now();
            continue;
        }
        ingested += drained;
        analyzer.update(1.0 / 60.0);
    }
    let stats = producer.join().unwrap();
    assert_eq!(stats.delivered_samples, left.len() as u64);

    analyzer.update(1.0 / 60.0);
    let history = analyzer.history().to_vec();
    assert_eq!(&history[history.len() - 16..], &left[left.len() - 16..]);

    // 160-320 Hz band
    assert_eq!(loudest_band(analyzer.rms()), 3);
}

#[test]
fn test_octave_sweep_hits_each_band() {
    let config = SpectrumConfig::default();
    for (band, frequency) in [30.0f32, 60.0, 120.0, 240.0, 480.0, 960.0, 1920.0, 3840.0, 7680.0]
        .into_iter()
        .enumerate()
    {
        let mut analyzer = SpectrumAnalyzer::new(&config).unwrap();
        analyzer.push_samples(&generate(
            &SyntheticSpec::sine(frequency, 0.5),
            config.sample_rate,
            config.fft_size,
        ));
        analyzer.update(1.0 / 60.0);
        assert_eq!(
            loudest_band(analyzer.rms()),
            band,
            "{} Hz should peak in band {}",
            frequency,
            band
        );
    }
}

#[test]
fn test_white_noise_energy_is_conserved() {
    let n = 4096;
    let signal = generate(
        &SyntheticSpec::new(SyntheticPattern::WhiteNoise, 0.0, 1.0),
        44_100,
        n,
    );
    let time_energy: f32 = signal.iter().map(|x| x * x).sum();

    let mut spectrum = signal.clone();
    real_transform(&mut spectrum, n, TransformDirection::Forward).unwrap();
    let freq_energy = FrequencyBins::new(&spectrum).total_energy();

    let expected = time_energy * (n / 2) as f32;
    assert!(((freq_energy - expected) / expected).abs() < 1e-3);
}

#[test]
fn test_cover_palette_to_theme() {
    let width = 20;
    let height = 10;
    let mut bytes = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let px = match (x < 10, y < 5) {
                (true, _) => [20, 20, 20, 255],
                (false, true) => [230, 200, 40, 255],
                (false, false) => [40, 90, 220, 128],
            };
            bytes.extend_from_slice(&px);
        }
    }
    let points = ColorPoints::from_rgba8(&bytes, width as u32, height as u32).unwrap();
    assert_eq!(points.len(), 200);

    let quantizer = ColorQuantizer::from_config(&AppConfig::default().palette).unwrap();
    let outcome = quantizer.quantize_from_seed(points.as_slice(), 0).unwrap();
    assert_eq!(outcome.palette.len(), 4);
    assert_eq!(outcome.palette.entries()[0].population, 100);

    let theme = Theme::from_palette(&outcome.palette);
    assert_eq!(theme.background, Rgb::new(20, 20, 20).opaque());
    // Alpha never influences clustering or output
    assert!(outcome.palette.colors().iter().all(|c| c.a == 255));
}
