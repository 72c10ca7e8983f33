//! Command parsing for the UCI loop.

use crate::search::{TimeControls, DEFAULT_SEARCH_TIME_MS};

#[derive(Debug, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position(Vec<String>),
    Go(GoParams),
    PonderHit,
    Stop,
    Quit,
    Unknown(String),
}

#[derive(Default, Debug, Clone)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub ponder: bool,
}

impl GoParams {
    /// Clock settings for the search. A bare `go` gets a fixed one-second
    /// window; otherwise missing fields fall back to the protocol defaults.
    #[must_use]
    pub fn time_controls(&self) -> TimeControls {
        let no_clocks = self.wtime.is_none()
            && self.btime.is_none()
            && self.winc.is_none()
            && self.binc.is_none();
        if no_clocks {
            return TimeControls::fixed(DEFAULT_SEARCH_TIME_MS);
        }
        TimeControls {
            wtime_ms: self.wtime.unwrap_or(30_000),
            btime_ms: self.btime.unwrap_or(30_000),
            winc_ms: self.winc.unwrap_or(0),
            binc_ms: self.binc.unwrap_or(0),
            forced_time_ms: None,
        }
    }
}

/// Parse the value following a keyword as type T.
#[inline]
fn parse_next<T: std::str::FromStr>(parts: &[&str], i: usize) -> Option<T> {
    parts.get(i + 1).and_then(|v| v.parse::<T>().ok())
}

#[must_use]
pub fn parse_go_params(parts: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < parts.len() {
        let consumed = match parts[i] {
            "wtime" => {
                params.wtime = parse_next(parts, i);
                2
            }
            "btime" => {
                params.btime = parse_next(parts, i);
                2
            }
            "winc" => {
                params.winc = parse_next(parts, i);
                2
            }
            "binc" => {
                params.binc = parse_next(parts, i);
                2
            }
            "ponder" => {
                params.ponder = true;
                1
            }
            _ => 1,
        };
        i += consumed;
    }

    params
}

/// Classify one input line.
#[must_use]
pub fn parse_command(line: &str) -> UciCommand {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&verb) = parts.first() else {
        return UciCommand::Unknown(String::new());
    };

    match verb {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "position" => UciCommand::Position(parts.iter().map(|s| s.to_string()).collect()),
        "go" => UciCommand::Go(parse_go_params(&parts)),
        "ponderhit" => UciCommand::PonderHit,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        _ => UciCommand::Unknown(line.to_string()),
    }
}
