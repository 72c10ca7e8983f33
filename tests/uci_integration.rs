//! Command-loop integration tests over in-memory readers and writers.

use std::io::Cursor;

use skewer::engine::{Engine, EngineConfig};
use skewer::uci::{parse_position_command, run_loop};

fn run_session(input: &str) -> Vec<String> {
    let mut engine = Engine::new(EngineConfig { log_search: false });
    let mut output = Vec::new();
    run_loop(&mut engine, Cursor::new(input.to_string()), &mut output).unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn handshake_and_ping() {
    let lines = run_session("uci\nisready\nquit\n");
    assert!(lines.contains(&"uciok".to_string()));
    assert!(lines.contains(&"readyok".to_string()));
}

#[test]
fn go_produces_a_bestmove() {
    // Short clocks trip the emergency budget, keeping the test fast.
    let lines = run_session(
        "position startpos moves e2e4 e7e5\ngo wtime 1000 btime 1000 winc 0 binc 0\nquit\n",
    );
    let bestmove = lines
        .iter()
        .find(|l| l.starts_with("bestmove "))
        .expect("go must answer with a bestmove");
    let fields: Vec<&str> = bestmove.split_whitespace().collect();
    assert!(fields.len() == 2 || fields.len() == 4);
    assert_eq!(fields[1].len(), 4);
}

#[test]
fn go_from_a_fen_position_finds_the_mate() {
    let lines = run_session(
        "position fen 8/8/8/8/kr5Q/8/8/1R5K w - - 0 1\ngo wtime 2000 btime 2000\nquit\n",
    );
    assert!(lines.iter().any(|l| l.starts_with("bestmove h4b4")));
}

#[test]
fn unknown_commands_are_skipped() {
    let lines = run_session("xyzzy\nuci\nquit\n");
    assert!(lines.contains(&"uciok".to_string()));
}

#[test]
fn malformed_position_commands_are_skipped() {
    // The bad FEN is rejected and the previous position stays in force.
    let lines = run_session(
        "position fen not a real fen at all x\nposition startpos\ngo wtime 1000 btime 1000\nquit\n",
    );
    assert!(lines.iter().any(|l| l.starts_with("bestmove ")));
}

#[test]
fn ponderhit_finishes_with_a_bestmove() {
    let lines = run_session(
        "position startpos moves e2e4\ngo ponder wtime 2000 btime 2000\nponderhit\nquit\n",
    );
    assert!(lines.iter().any(|l| l.starts_with("bestmove ")));
}

#[test]
fn stop_flushes_the_ponder_result() {
    let lines = run_session(
        "position startpos moves e2e4\ngo ponder wtime 60000 btime 60000\nstop\nquit\n",
    );
    assert!(lines.iter().any(|l| l.starts_with("bestmove ")));
}

#[test]
fn ucinewgame_resets_and_keeps_working() {
    let lines = run_session(
        "position startpos\ngo wtime 1000 btime 1000\nucinewgame\nposition startpos\ngo wtime 1000 btime 1000\nquit\n",
    );
    let count = lines.iter().filter(|l| l.starts_with("bestmove ")).count();
    assert_eq!(count, 2);
}

#[test]
fn position_command_applies_move_lists() {
    let parts = ["position", "startpos", "moves", "e2e4", "c7c5", "g1f3"];
    let board = parse_position_command(&parts).unwrap();
    assert_eq!(
        board.to_fen(),
        "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );
}

#[test]
fn position_command_rejects_garbage() {
    assert!(parse_position_command(&["position"]).is_err());
    assert!(parse_position_command(&["position", "fen", "only", "three", "fields"]).is_err());
    assert!(
        parse_position_command(&["position", "startpos", "moves", "e2e9"]).is_err(),
        "unparseable move"
    );
}
