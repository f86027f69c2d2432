use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tasktalk::backend::{Backend, HttpBackend};
use tasktalk::voice::{AudioCapture, AudioPlayback, SAMPLE_RATE, Synthesizer};
use tasktalk::{Config, Shell};

/// tasktalk - voice-enabled chat client for an AI task assistant
#[derive(Parser)]
#[command(name = "tasktalk", version, about)]
struct Cli {
    /// Backend base URL (e.g. http://localhost:8000)
    #[arg(long, env = "TASKTALK_BACKEND_URL")]
    backend_url: Option<String>,

    /// Language code (en, ur, hi, es, fr, ar)
    #[arg(short, long, env = "TASKTALK_LANGUAGE")]
    language: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable voice features (no microphone or speech engine required)
    #[arg(long, env = "TASKTALK_DISABLE_VOICE")]
    no_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Speak a line of text through the TTS engine
    Say {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Fetch and print the current task list
    Todos,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity; stdout belongs to the conversation
    let filter = match cli.verbose {
        0 => "info,tasktalk=info",
        1 => "info,tasktalk=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_with_options(
        cli.backend_url.as_deref(),
        cli.language.as_deref(),
        cli.no_voice,
    )?;
    tracing::debug!(backend = %config.backend_url, "loaded configuration");

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::Say { text } => say(&config, &text).await,
            Command::Todos => todos(&config).await,
        };
    }

    let shell = Shell::new(config)?;
    shell.run().await?;

    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    println!("Sample rate: {SAMPLE_RATE} Hz");
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.take_samples();
        let energy = calculate_rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "█".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {energy:.4} | Peak: {peak:.4} | [{meter}]",
            i + 1
        );
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");

    Ok(())
}

/// Calculate RMS energy
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Synthesize and play one line of text
async fn say(config: &Config, text: &str) -> anyhow::Result<()> {
    println!("Synthesizing: \"{text}\"\n");

    let synthesizer = Synthesizer::new(&config.speech)?;
    let mp3 = synthesizer
        .synthesize(text, config.language.unwrap_or_default())
        .await?;
    println!("Got {} bytes of audio", mp3.len());

    println!("Playing...");
    let volume = config.speech.volume;
    tokio::task::spawn_blocking(move || {
        let playback = AudioPlayback::new(volume)?;
        let stop = AtomicBool::new(false);
        playback.play_mp3(&mp3, &stop)
    })
    .await??;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}

/// Fetch and print the task list
async fn todos(config: &Config) -> anyhow::Result<()> {
    let backend = HttpBackend::new(config.backend_url.clone())?;
    let tasks = backend.fetch_tasks().await?;

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    for task in &tasks {
        let mark = if task.completed { "x" } else { " " };
        println!("[{mark}] {} (#{})", task.title, task.id);
    }
    println!("\n{} task(s)", tasks.len());

    Ok(())
}
