//! Universal Chess Interface front end.
//!
//! A line-oriented loop over the recognized verbs. Syntax errors are
//! reported and skipped; only `quit` (or end of input) ends the loop.

mod command;

use std::fmt;
use std::io::{self, BufRead, Write};

use crate::board::{Board, FenError, MoveParseError};
use crate::engine::Engine;
use crate::search::Evaluation;

pub use command::{parse_command, parse_go_params, GoParams, UciCommand};

/// Errors from the `position` command.
#[derive(Debug, Clone)]
pub enum UciError {
    /// The FEN payload failed to parse
    InvalidFen(FenError),
    /// A move in the move list failed to parse
    InvalidMove {
        move_str: String,
        error: MoveParseError,
    },
    /// The command is structurally incomplete
    MissingParts,
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "invalid FEN: {e}"),
            UciError::InvalidMove { move_str, error } => {
                write!(f, "invalid move '{move_str}': {error}")
            }
            UciError::MissingParts => write!(f, "incomplete position command"),
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

/// Build a board from a `position` command's tokens.
///
/// Supports `position startpos [moves ...]` and
/// `position fen <6 fields> [moves ...]`.
pub fn parse_position_command(parts: &[&str]) -> Result<Board, UciError> {
    let mut i = 1;
    let mut board = match parts.get(i) {
        Some(&"startpos") => {
            i += 1;
            Board::new()
        }
        Some(&"fen") => {
            if i + 6 >= parts.len() {
                return Err(UciError::MissingParts);
            }
            let fen = parts[i + 1..i + 7].join(" ");
            i += 7;
            Board::try_from_fen(&fen)?
        }
        _ => return Err(UciError::MissingParts),
    };

    if parts.get(i) == Some(&"moves") {
        for move_str in &parts[i + 1..] {
            board
                .apply_uci_move(move_str)
                .map_err(|error| UciError::InvalidMove {
                    move_str: (*move_str).to_string(),
                    error,
                })?;
        }
    }

    Ok(board)
}

fn format_bestmove(eval: &Evaluation) -> String {
    match eval.ponder_move {
        Some(ponder) => format!("bestmove {} ponder {}", eval.best_move, ponder),
        None => format!("bestmove {}", eval.best_move),
    }
}

/// Drive the command loop until `quit` or end of input.
///
/// Reader and writer are injected so the loop is testable against string
/// buffers; the binary passes locked stdin/stdout.
pub fn run_loop<R: BufRead, W: Write>(
    engine: &mut Engine,
    reader: R,
    mut writer: W,
) -> io::Result<()> {
    let respond = |writer: &mut W, line: &str| -> io::Result<()> {
        tracing::info!(target: "uci", output = line);
        writeln!(writer, "{line}")?;
        writer.flush()
    };

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        tracing::info!(target: "uci", input = line);

        let cmd = parse_command(line);

        // A ponder search only survives the two verbs that consume it.
        if !matches!(cmd, UciCommand::PonderHit | UciCommand::Stop) {
            engine.abandon_ponder();
        }

        match cmd {
            UciCommand::Uci => {
                respond(&mut writer, "id name skewer")?;
                respond(&mut writer, "uciok")?;
            }
            UciCommand::IsReady => respond(&mut writer, "readyok")?,
            UciCommand::UciNewGame => engine.new_game(),
            UciCommand::Position(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                match parse_position_command(&parts) {
                    Ok(board) => engine.set_board(board),
                    Err(e) => tracing::warn!(target: "uci", "position rejected: {e}"),
                }
            }
            UciCommand::Go(params) if params.ponder => {
                engine.start_ponder(params.time_controls());
            }
            UciCommand::Go(params) => match engine.go(&params.time_controls()) {
                Ok(eval) => respond(&mut writer, &format_bestmove(&eval))?,
                Err(e) => tracing::error!(target: "uci", "search failed: {e}"),
            },
            UciCommand::PonderHit => {
                if let Some(eval) = engine.ponder_hit() {
                    respond(&mut writer, &format_bestmove(&eval))?;
                }
            }
            UciCommand::Stop => {
                if let Some(eval) = engine.stop() {
                    respond(&mut writer, &format_bestmove(&eval))?;
                }
            }
            UciCommand::Quit => break,
            UciCommand::Unknown(line) => {
                tracing::warn!(target: "uci", "unknown command: {line}");
            }
        }
    }

    Ok(())
}
