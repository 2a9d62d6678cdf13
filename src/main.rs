// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{crate_version, Parser, Subcommand};
use hapsync::audio::SymphoniaDecoder;
use hapsync::config::{load_settings, Settings};
use hapsync::export::{event_streams_csv, haptic_csv, write_csv};
use hapsync::pattern::{PatternDocument, DEFAULT_PATTERN};
use hapsync::util::{filename_display, waveform_csv_filename};
use hapsync::visualizer::{analyze, AnalysisOptions, AudioView, HapticAnalysis};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A haptic pattern and audio waveform analyzer."
)]
struct Cli {
    /// The path to a settings file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the summary metrics and event streams of a pattern.
    Analyze {
        /// The path to the pattern, or - to read standard input.
        path: String,
    },
    /// Writes the sampled curves of a pattern as CSV.
    Export {
        /// The path to the pattern, or - to read standard input.
        path: String,
        /// The CSV file to write.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Export the per event type streams instead of the curves.
        #[arg(long)]
        events: bool,
    },
    /// Analyzes a .wav file and writes its downsampled waveform as CSV.
    Audio {
        /// The path to the audio file.
        path: PathBuf,
        /// The CSV file to write.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Prints the bundled default pattern.
    DefaultPattern {},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze { path } => {
            let analysis = analyze_pattern(&path, &settings)?;

            match &analysis.summary {
                Some(summary) => {
                    println!("Curves ({} samples):", analysis.curves.len());
                    print!("{}", summary);
                }
                None => println!("No intensity or sharpness curves."),
            }

            if analysis.events.is_empty() {
                println!("No events.");
                return Ok(());
            }

            println!(
                "Event streams (count: {}, duration: {:.3} s):",
                analysis.events.len(),
                analysis.duration
            );
            for stream in &analysis.events.streams {
                println!("- {}:", stream.event_type);
                if let Some(summary) = &stream.summary {
                    for (label, value) in summary.metrics() {
                        println!("    {:<16}{}", label, value);
                    }
                }
            }
        }
        Commands::Export {
            path,
            output,
            events,
        } => {
            let analysis = analyze_pattern(&path, &settings)?;
            let contents = if events {
                event_streams_csv(&analysis.events)
            } else {
                haptic_csv(&analysis.curves)
            };
            let output =
                output.unwrap_or_else(|| PathBuf::from(settings.haptic_csv_filename()));
            write_csv(&output, &contents)?;
            println!("Wrote {}", output.display());
        }
        Commands::Audio { path, output } => {
            let bytes = std::fs::read(&path)?;
            let extension = path.extension().and_then(|extension| extension.to_str());

            let mut view = AudioView::new(Arc::new(SymphoniaDecoder::new(extension)))
                .with_max_points(settings.max_audio_points());
            view.upload(filename_display(&path), bytes).await;
            if let Some(err) = view.error() {
                return Err(err.into());
            }

            if let Some(summary) = view.summary() {
                for (label, value) in summary.metrics() {
                    println!("{:<16}{}", label, value);
                }
            }

            let output = output.unwrap_or_else(|| csv_path(&path, &settings));
            write_csv(&output, &view.waveform_csv())?;
            println!("Wrote {} points to {}", view.waveform().len(), output.display());
        }
        Commands::DefaultPattern {} => {
            println!("{}", DEFAULT_PATTERN);
        }
    }

    Ok(())
}

/// Reads and analyzes a pattern, failing on read or parse errors.
fn analyze_pattern(path: &str, settings: &Settings) -> Result<HapticAnalysis, Box<dyn Error>> {
    let document = if path == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        PatternDocument::parse(&text)?
    } else {
        PatternDocument::from_file(Path::new(path))?
    };

    let options = AnalysisOptions {
        sample_count: settings.sample_count(),
        event_durations: settings.event_duration_defaults()?,
        min_visual_duration: settings.min_visual_duration()?,
    };

    Ok(analyze(&document, &options))
}

/// Places the derived waveform CSV name next to the audio file.
fn csv_path(audio_path: &Path, settings: &Settings) -> PathBuf {
    let file_name = waveform_csv_filename(
        filename_display(audio_path),
        settings.audio_csv_filename(),
    );
    match audio_path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}
