//! Optical Morse CLI
//!
//! Command-line interface for demonstrating the decoder with a synthetic
//! blinking light.

use clap::{Parser, Subcommand};
use optical_morse::{
    capture::{BlinkingCamera, Camera, FileConfig, FrameRate},
    clustering::KMeans,
    metrics::{MetricsRegistry, MetricsSnapshot},
    morse,
    recording::{ChannelSink, RecorderEvent, SignalRecorder},
    sampling::ImageSample,
    translation::{KMeansNormalizer, SubmitCode, TranslationResult, Translator},
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Decode Morse code from a blinking light
#[derive(Parser)]
#[command(name = "optical-morse")]
#[command(version = optical_morse::VERSION)]
#[command(about = "Decode Morse code from a blinking light", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Film a message with the synthetic camera and translate it offline
    Decode {
        /// Message to key
        #[arg(short, long)]
        text: String,

        /// Frames per Morse unit
        #[arg(long, default_value_t = 4)]
        unit_ticks: usize,

        /// Noise-floor threshold (overrides the configuration)
        #[arg(short, long)]
        baseline: Option<u8>,
    },

    /// Run a live recording session against the synthetic camera
    Record {
        /// Message to key
        #[arg(short, long)]
        text: String,

        /// Frames per Morse unit
        #[arg(long, default_value_t = 6)]
        unit_ticks: usize,

        /// Maximum session length in seconds (overrides the configuration)
        #[arg(long)]
        seconds: Option<u32>,

        /// Sampling rate, 30 or 60 (overrides the configuration)
        #[arg(long)]
        fps: Option<u32>,

        /// Print Prometheus metrics after the run
        #[arg(long)]
        metrics: bool,
    },

    /// Print the Morse table
    Table,
}

type CliResult = Result<(), Box<dyn Error>>;

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => FileConfig::default(),
    };

    let outcome = match cli.command {
        Commands::Decode {
            text,
            unit_ticks,
            baseline,
        } => decode(&config, &text, unit_ticks, baseline),
        Commands::Record {
            text,
            unit_ticks,
            seconds,
            fps,
            metrics,
        } => record(config, &text, unit_ticks, seconds, fps, metrics),
        Commands::Table => {
            for (letter, glyphs) in morse::entries() {
                println!("{}  {}", letter, glyphs);
            }
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_result(result: &TranslationResult) {
    match (result.morse(), result.text()) {
        (Some(morse), Some(text)) => {
            println!("Morse: {}", morse);
            println!("Text:  {}", text);
        }
        _ => println!("No message found (baseline {})", result.baseline()),
    }
}

fn decode(config: &FileConfig, text: &str, unit_ticks: usize, baseline: Option<u8>) -> CliResult {
    let baseline = baseline.unwrap_or(config.recorder.baseline);

    let mut camera = BlinkingCamera::from_text(text, unit_ticks);
    camera.open(&config.camera)?;

    let frame_count = camera.schedule().len();
    info!(frames = frame_count, unit_ticks, "filming message");

    let mut frames = Vec::with_capacity(frame_count);
    for _ in 0..frame_count {
        let frame = camera.capture()?;
        frames.push(ImageSample::from_frame(&frame)?.contrast());
    }
    camera.close();

    let normalizer = KMeansNormalizer::new(KMeans::new(config.clustering.iterations));
    let mut translator = Translator::new(Box::new(normalizer), Duration::ZERO);
    let result = translator.resolve(SubmitCode(1), &frames, baseline);
    print_result(&result);
    Ok(())
}

fn record(
    mut config: FileConfig,
    text: &str,
    unit_ticks: usize,
    seconds: Option<u32>,
    fps: Option<u32>,
    metrics: bool,
) -> CliResult {
    if let Some(seconds) = seconds {
        config.recorder.session_seconds = seconds;
    }
    if let Some(fps) = fps {
        config.recorder.frame_rate = FrameRate::try_from(fps)?;
    }
    let frame_period = config.recorder.frame_rate.tick_period();

    let (sink, events) = ChannelSink::channel();
    let recorder = Arc::new(SignalRecorder::with_clustering(
        config.recorder.clone(),
        &config.clustering,
        Arc::new(sink),
    )?);

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        if let Err(e) = ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut camera = BlinkingCamera::from_text(text, unit_ticks);
    camera.open(&config.camera)?;
    let frame_count = camera.schedule().len();

    recorder.start_processing()?;
    recorder.start_recording()?;
    info!(
        frames = frame_count,
        buffer = recorder.buffer_len(),
        "recording started, press Ctrl-C to stop early"
    );

    let feeder = {
        let recorder = Arc::clone(&recorder);
        thread::Builder::new()
            .name("morse-camera".into())
            .spawn(move || {
                for _ in 0..frame_count {
                    if !recorder.is_recording() {
                        break;
                    }
                    let delivered = camera
                        .capture()
                        .map_err(|e| e.to_string())
                        .and_then(|frame| {
                            recorder.deliver_frame(&frame).map_err(|e| e.to_string())
                        });
                    if let Err(e) = delivered {
                        warn!("Frame delivery failed: {}", e);
                        break;
                    }
                    thread::sleep(frame_period);
                }
                camera.close();
                if let Err(e) = recorder.stop_recording() {
                    warn!("Failed to stop recording: {}", e);
                }
            })?
    };

    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            info!("interrupted, stopping recording");
            recorder.stop_recording()?;
        }
        match events.recv_timeout(Duration::from_millis(100)) {
            Ok(RecorderEvent::TranslationComplete(result)) => {
                print_result(&result);
                break;
            }
            Ok(RecorderEvent::Render(snapshot)) => {
                debug!(recorded = recorder.recorded_frames(), len = snapshot.len(), "render");
            }
            Ok(event) => debug!(kind = event.kind(), "recorder event"),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if feeder.join().is_err() {
        warn!("Camera thread panicked");
    }

    if metrics {
        let registry = MetricsRegistry::new()?;
        registry.update(&MetricsSnapshot::from_stats(
            recorder.stats(),
            recorder.baseline(),
        ));
        print!("{}", registry.encode()?);
    }

    recorder.shutdown();
    Ok(())
}
