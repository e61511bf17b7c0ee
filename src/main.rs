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
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{crate_version, Parser, Subcommand};
use morse_converter::audio::{self, Player, TimingProfile};
use morse_converter::config::{Settings, DEFAULT_CONFIG_FILE};
use morse_converter::file;
use morse_converter::logging;
use morse_converter::morse::{Converter, SymbolTable};
use morse_converter::validator::Validator;
use parking_lot::Mutex;
use tracing::{info, warn};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Converts between text and Morse code and plays Morse code as audio."
)]
struct Cli {
    /// The path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Converts text to Morse code.
    TextToMorse {
        /// The text to convert. Ignored when --input is given.
        text: Option<String>,
        /// Reads the text from this file.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Writes the Morse code to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Converts Morse code to text.
    MorseToText {
        /// The Morse code to convert. Ignored when --input is given.
        morse: Option<String>,
        /// Reads the Morse code from this file.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Writes the text to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Plays Morse code through the audio interface.
    Play {
        /// The Morse code to play.
        message: String,
        /// Treat the message as text and convert it to Morse code first.
        #[arg(short, long)]
        text: bool,
        /// The tone frequency in Hz.
        #[arg(short, long)]
        frequency: Option<f64>,
        /// The sending speed in words per minute.
        #[arg(short, long)]
        wpm: Option<u32>,
        /// The device name to play through.
        #[arg(short, long)]
        device: Option<String>,
        /// Writes the audio to this WAV file instead of playing it.
        #[arg(long)]
        wav: Option<PathBuf>,
    },
    /// Lists the available audio output devices.
    Devices {},
    /// Writes the default configuration to the given path.
    InitConfig {
        /// Where to write the configuration.
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_message(e.as_ref()));
            ExitCode::FAILURE
        }
    }
}

/// The message shown for a failed command. Every error carries its cause in its own message.
fn error_message(err: &dyn Error) -> String {
    format!("Error: {}", err)
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let settings = Settings::load(&cli.config)?;
    logging::init(settings.system())?;

    let validator = Validator::new();
    let converter = Converter::new(Arc::new(SymbolTable::new()));

    match cli.command {
        Commands::TextToMorse {
            text,
            input,
            output,
        } => {
            let text = read_message(text, input)?;
            validator.validate_text(&text)?;
            let morse = converter.text_to_morse(&text)?;
            emit(&morse, output.as_deref())?;
        }
        Commands::MorseToText {
            morse,
            input,
            output,
        } => {
            let morse = read_message(morse, input)?;
            validator.validate_morse(&morse)?;
            let text = converter.morse_to_text(&morse)?;
            emit(&text, output.as_deref())?;
        }
        Commands::Play {
            message,
            text,
            frequency,
            wpm,
            device,
            wav,
        } => {
            let morse = if text {
                validator.validate_text(&message)?;
                converter.text_to_morse(&message)?
            } else {
                validator.validate_morse(&message)?;
                message
            };

            let mut synthesizer = settings.audio().synthesizer()?;
            if let Some(frequency) = frequency {
                synthesizer.set_frequency(frequency)?;
            }
            if let Some(wpm) = wpm {
                synthesizer.set_timing_profile(TimingProfile::from_wpm(wpm)?);
            }
            synthesizer.generate(&morse)?;

            if let Some(wav) = wav {
                let buffer = synthesizer.buffer().ok_or("no audio generated")?;
                audio::wav::write(&wav, &buffer, synthesizer.sample_rate())?;
                println!("Audio saved to: {}", wav.display());
                return Ok(());
            }

            let device_name = device.as_deref().unwrap_or(settings.audio().device());
            let device = audio::get_device(device_name)?;
            let player = Arc::new(Player::new(Arc::new(Mutex::new(synthesizer)), device));
            play_until_interrupted(player).await?;
        }
        Commands::Devices {} => {
            let devices = audio::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::InitConfig { path } => {
            Settings::defaults().save(&path)?;
            println!("Configuration saved to: {}", path.display());
        }
    }

    Ok(())
}

/// Returns the message from the input file if one is given, otherwise the argument.
fn read_message(
    argument: Option<String>,
    input: Option<PathBuf>,
) -> Result<String, Box<dyn Error>> {
    match (input, argument) {
        (Some(input), _) => Ok(file::read_to_string(&input)?.trim_end().to_string()),
        (None, Some(argument)) => Ok(argument),
        (None, None) => Err("either a message or --input must be given".into()),
    }
}

/// Prints the result and saves it to the output file if one is given.
fn emit(result: &str, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    println!("{}", result);
    if let Some(output) = output {
        file::write(output, result)?;
        println!("Output saved to: {}", output.display());
    }
    Ok(())
}

/// Plays on a blocking task and stops the device if the process is interrupted.
async fn play_until_interrupted(player: Arc<Player>) -> Result<(), Box<dyn Error>> {
    let playback = {
        let player = player.clone();
        tokio::task::spawn_blocking(move || player.play())
    };
    tokio::pin!(playback);

    tokio::select! {
        result = &mut playback => {
            result??;
            info!("Done playing.");
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping playback.");
            player.stop()?;
            playback.await??;
        }
    }

    Ok(())
}
