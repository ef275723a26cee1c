use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use voice_wellness::{analyze, EmotionLabel, RawEmotionScores};

/// Offline wellness analyzer: score a WAV file with precomputed emotion
/// probabilities
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input WAV file
    input: PathBuf,

    /// Path to a JSON file mapping the 8 emotion labels to probabilities
    /// (model inference output). Without it, a uniform-neutral distribution
    /// is used so the acoustic pipeline can be exercised alone.
    #[arg(short, long)]
    emotions: Option<PathBuf>,

    /// Compact JSON output instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let scores = load_emotion_scores(args.emotions.as_deref())?;
    let (samples, sample_rate) = load_wav(&args.input)?;
    info!(
        samples = samples.len(),
        sample_rate,
        seconds = samples.len() as f32 / sample_rate as f32,
        "audio loaded"
    );

    let report = analyze(&scores, &samples, sample_rate)?;

    let json = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");
    Ok(())
}

/// Read emotion scores from JSON, or fall back to a pure-neutral distribution.
fn load_emotion_scores(path: Option<&std::path::Path>) -> Result<RawEmotionScores> {
    let map: HashMap<String, f32> = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading emotion scores from {}", path.display()))?;
            serde_json::from_str(&text).context("emotion scores must be a JSON object of label -> probability")?
        }
        None => {
            info!("no emotion scores provided, assuming neutral");
            EmotionLabel::ALL
                .iter()
                .map(|l| {
                    let p = if *l == EmotionLabel::Neutral { 1.0 } else { 0.0 };
                    (l.as_str().to_string(), p)
                })
                .collect()
        }
    };
    Ok(RawEmotionScores::new(map))
}

/// Load a WAV file as sanitized mono f32 samples.
///
/// This is the boundary the library documents: non-finite samples are zeroed
/// and the signal is normalized into [-1, 1] before analysis.
fn load_wav(path: &std::path::Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    debug!(?spec, "wav spec");

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .context("decoding float samples")?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .context("decoding integer samples")?
        }
    };

    if interleaved.is_empty() {
        bail!("audio file is empty");
    }

    // Mixdown to mono
    let channels = spec.channels as usize;
    let mut samples: Vec<f32> = if channels <= 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    // Sanitize: the scoring library assumes finite samples in [-1, 1]
    let mut bad = 0usize;
    for s in &mut samples {
        if !s.is_finite() {
            *s = 0.0;
            bad += 1;
        }
    }
    if bad > 0 {
        warn!(count = bad, "non-finite samples replaced with zeros");
    }
    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak > 1.0 {
        for s in &mut samples {
            *s /= peak;
        }
    }

    Ok((samples, spec.sample_rate))
}
