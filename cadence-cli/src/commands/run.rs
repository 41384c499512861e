//! Run the pacer in the terminal.
//!
//! Frames go to stdout. Control commands are read from stdin, one per line:
//!
//! - `repeat`, `forward`, `reverse`, `stop`, `reset`, `none`
//! - `tempo <secs>`: change the half-cycle duration
//! - `text [value]`: set (or clear) the overlay text
//! - `quit`: stop the pacer and exit

use anyhow::{Context, Result};
use cadence_client::{spawn_pacer_loop, DriverInputs, LoggingDispatcher, PacerController};
use cadence_core::{PacerState, RenderFrame, RADIUS_MAX, RADIUS_MIN};
use cadence_types::{ControlCommand, PacerError, Phase, Tempo};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::config::Config;

const BAR_WIDTH: usize = 32;

/// Command-line overrides for the run command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Seconds per half-cycle.
    pub tempo: Option<f64>,
    /// Cue volume, 0-100.
    pub volume: Option<u32>,
    /// Initial overlay text.
    pub text: Option<String>,
    /// Print JSON frames.
    pub json: bool,
    /// Stop after this many seconds.
    pub duration: Option<f64>,
}

/// One line of stdin input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Change the control command.
    Command(ControlCommand),
    /// Change the tempo.
    Tempo(Tempo),
    /// Set or clear the overlay text.
    Text(Option<String>),
    /// Stop and exit.
    Quit,
}

/// Parse one line of stdin. Blank lines yield `None`.
pub fn parse_input(line: &str) -> Result<Option<Input>, PacerError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => Input::Quit,
        "tempo" => {
            let secs: f64 = rest
                .parse()
                .map_err(|_| PacerError::UnknownCommand(line.to_string()))?;
            Input::Tempo(Tempo::from_secs_f64(secs)?)
        }
        "text" if rest.is_empty() => Input::Text(None),
        "text" => Input::Text(Some(rest.to_string())),
        _ => Input::Command(line.parse()?),
    };
    Ok(Some(input))
}

/// Run the pacer until `quit`, end of input or the duration elapses.
pub async fn run(mut config: Config, options: RunOptions) -> Result<()> {
    if let Some(tempo) = options.tempo {
        config.pacer.tempo_secs = tempo;
    }
    if let Some(volume) = options.volume {
        config.pacer.volume = volume;
    }
    let pacer_config = config.pacer_config()?;
    let duration = options
        .duration
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("Invalid duration")?;

    tracing::info!(
        "Starting pacer (tempo {}, volume {}%)",
        pacer_config.tempo,
        pacer_config.cues.volume.percent()
    );

    let (command_tx, command_rx) = watch::channel(ControlCommand::Repeat);
    let (tempo_tx, tempo_rx) = watch::channel(pacer_config.tempo.as_duration());
    let controller = PacerController::new(pacer_config, LoggingDispatcher::new());
    let mut states = controller.subscribe();
    let pacer_loop = spawn_pacer_loop(
        controller,
        DriverInputs {
            command: command_rx,
            tempo: tempo_rx,
        },
        config.frame_interval(),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut text = options.text;
    let mut phase_changes = 0u64;
    let mut last_phase = Phase::Idle;

    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *states.borrow_and_update();
                if state.phase != last_phase {
                    phase_changes += 1;
                    last_phase = state.phase;
                }
                print_frame(&state, text.as_deref(), options.json)?;
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read stdin")? {
                    Some(line) => match parse_input(&line) {
                        Ok(Some(Input::Quit)) => break,
                        Ok(Some(Input::Command(command))) => {
                            tracing::debug!("Command: {}", command);
                            command_tx.send_replace(command);
                        }
                        Ok(Some(Input::Tempo(tempo))) => {
                            tracing::info!("Tempo: {}", tempo);
                            tempo_tx.send_replace(tempo.as_duration());
                        }
                        Ok(Some(Input::Text(value))) => text = value,
                        Ok(None) => {}
                        Err(e) => tracing::warn!("{}", e),
                    },
                    None if duration.is_some() => stdin_open = false,
                    None => break,
                }
            }
        }
    }

    let final_state = pacer_loop.stop().await?;
    if !options.json {
        println!();
        println!(
            "Finished in {} ({} phase changes, tempo {})",
            final_state.phase, phase_changes, final_state.tempo
        );
    }
    Ok(())
}

fn print_frame(state: &PacerState, text: Option<&str>, json: bool) -> Result<()> {
    let frame = RenderFrame::from_state(state, text);
    let mut stdout = std::io::stdout().lock();
    if json {
        writeln!(stdout, "{}", serde_json::to_string(&frame)?)?;
    } else {
        write!(stdout, "\r{}", bar(&frame))?;
        stdout.flush()?;
    }
    Ok(())
}

/// One-line text rendering of a frame.
fn bar(frame: &RenderFrame) -> String {
    let fill = (frame.radius - RADIUS_MIN) / (RADIUS_MAX - RADIUS_MIN);
    let filled = (fill * BAR_WIDTH as f64).round() as usize;
    format!(
        "{:<9} [{:<width$}] {:>5.1} {:<12}",
        frame.phase,
        "#".repeat(filled.min(BAR_WIDTH)),
        frame.radius,
        frame.display_text.as_deref().unwrap_or(""),
        width = BAR_WIDTH
    )
}
