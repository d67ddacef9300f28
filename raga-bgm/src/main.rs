//! raga-bgm - script entry point
//!
//! Analyses one recording, asks Gemini for a composition suggestion, and
//! writes the generated melody as MIDI and WAV plus a pitch contour plot.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use raga_bgm::config::BgmConfig;
use raga_bgm::models::{Artifacts, CompositionRequest, Mood, DEFAULT_RAGA};
use raga_bgm::services::{GeminiClient, Pipeline};
use raga_bgm::{DEFAULT_MIDI_FILE, DEFAULT_PLOT_FILE, DEFAULT_WAV_FILE};

/// Command-line arguments for raga-bgm
#[derive(Parser, Debug)]
#[command(name = "raga-bgm")]
#[command(about = "Generate background music from a recording's tempo and pitch contour")]
#[command(version)]
struct Args {
    /// Input audio file
    #[arg(short, long)]
    input: PathBuf,

    /// Raga name (prompted on stdin when omitted)
    #[arg(short, long)]
    raga: Option<String>,

    /// Mood (prompted on stdin when omitted)
    #[arg(short, long)]
    mood: Option<String>,

    /// MIDI output path
    #[arg(long, default_value = DEFAULT_MIDI_FILE)]
    midi_out: PathBuf,

    /// Rendered WAV output path
    #[arg(long, default_value = DEFAULT_WAV_FILE)]
    wav_out: PathBuf,

    /// Pitch contour plot (SVG) output path
    #[arg(long, default_value = DEFAULT_PLOT_FILE)]
    plot_out: PathBuf,

    /// TOML config file (default: <config_dir>/raga-bgm/config.toml)
    #[arg(short, long, env = "RAGA_BGM_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = raga_common::config::load_config(args.config.as_deref())
        .context("Failed to load configuration")?;
    raga_common::logging::init_logging(&toml_config.logging)
        .context("Failed to initialize logging")?;

    let config = BgmConfig::resolve(toml_config).context("Invalid configuration")?;

    let raga = match args.raga {
        Some(raga) => raga,
        None => prompt_line(&raga_prompt(), DEFAULT_RAGA)?,
    };
    let mood = match args.mood {
        Some(mood) => mood,
        None => prompt_line(&mood_prompt(), Mood::ALL[0].as_str())?,
    };
    let request = CompositionRequest::new(raga, mood);

    let client = GeminiClient::new(config.gemini.clone())
        .context("Failed to create Gemini client")?;
    let pipeline = Pipeline::new(Arc::new(client));

    let artifacts = Artifacts {
        midi_path: args.midi_out,
        wav_path: args.wav_out,
        plot_path: Some(args.plot_out),
    };

    info!(model = %config.gemini.model, "Running pipeline");
    let report = pipeline
        .run(&args.input, &request, &artifacts)
        .await
        .with_context(|| format!("Failed to generate BGM from {}", args.input.display()))?;

    println!("Tempo: {:.2} BPM", report.features.tempo_bpm);
    println!("Average pitch: {:.2} Hz", report.features.average_pitch_hz);
    println!();
    println!("AI Composition Suggestion:");
    println!("{}", report.suggestion);
    println!();
    println!("MIDI file saved as {}", report.artifacts.midi_path.display());
    println!("WAV file saved as {}", report.artifacts.wav_path.display());
    if let Some(plot) = &report.artifacts.plot_path {
        println!("Pitch contour saved as {}", plot.display());
    }

    Ok(())
}

fn raga_prompt() -> String {
    format!("Enter the Raga (e.g., {}, Bhairav) [{}]: ", DEFAULT_RAGA, DEFAULT_RAGA)
}

fn mood_prompt() -> String {
    let moods: Vec<&str> = Mood::ALL.iter().map(|m| m.as_str()).collect();
    format!("Enter the Mood (e.g., {}) [{}]: ", moods.join(", "), Mood::ALL[0])
}

/// Print `label` and read one answer from stdin
fn prompt_line(label: &str, default: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush().context("Failed to flush stdout")?;
    read_answer(&mut io::stdin().lock(), default)
}

/// One trimmed line; blank input or EOF falls back to `default`
fn read_answer(reader: &mut impl BufRead, default: &str) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    let answer = line.trim();
    if answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer.to_string())
    }
}
