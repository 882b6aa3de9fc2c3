use std::fs;
use std::io::Cursor;

use coinduel_cli::{run, run_with_input};
use coinduel_engine::logger::MatchRecord;

fn cf(args: &[&str], input: &str) -> (i32, String, String) {
    let mut argv = vec!["coinduel", "cf"];
    argv.extend_from_slice(args);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut stdin = Cursor::new(input.as_bytes().to_vec());
    let code = run_with_input(argv, &mut out, &mut err, &mut stdin);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn first_to_three_runs_to_completion() {
    let (code, out, err) = cf(
        &[
            "Alice", "vs", "bob", "ft", "3", "--side-a", "heads", "--side-b", "tails", "--seed",
            "7", "--pace-ms", "0",
        ],
        "",
    );
    assert_eq!(code, 0, "stderr: {}", err);
    assert!(out.starts_with("Alice (HEADS) vs bob (TAILS) - First to 3\n"));
    assert!(out.contains("Round 1: "));
    assert!(out.contains("Mode: First to 3"));
    assert!(out.contains("Alice WINS!") || out.contains("bob WINS!"));
    assert!(!out.contains("IT'S A TIE!"));
}

#[test]
fn same_seed_gives_same_transcript() {
    let args = [
        "ann", "vs", "bob", "bo", "9", "--side-a", "t", "--side-b", "h", "--seed", "2024",
        "--pace-ms", "0",
    ];
    let (c1, o1, _) = cf(&args, "");
    let (c2, o2, _) = cf(&args, "");
    assert_eq!((c1, c2), (0, 0));
    assert_eq!(o1, o2);
}

#[test]
fn grammar_errors_exit_with_two() {
    let cases: [(&[&str], &str); 5] = [
        (&["a", "versus", "b"], "Please use \"vs\" between usernames"),
        (&["a", "vs", "b", "ft"], "Specify rounds for \"ft\" mode"),
        (&["a", "vs", "b", "xx", "3"], "Invalid mode! Use \"ft\" or \"bo\"."),
        (&["a", "vs", "b", "bo", "201"], "Rounds must be between 1 and 200"),
        (&["<@42>", "vs", "<@!42>"], "cannot duel themselves"),
    ];
    for (args, expected) in cases {
        let (code, out, err) = cf(args, "");
        assert_eq!(code, 2, "args {:?}", args);
        assert!(err.contains(expected), "args {:?} stderr {}", args, err);
        assert!(!out.contains("Round 1"));
    }
}

#[test]
fn quitting_at_prompt_exits_130() {
    let (code, out, err) = cf(&["ann", "vs", "bob", "--pace-ms", "0"], "quit\n");
    assert_eq!(code, 130);
    assert!(out.contains("ann, choose heads or tails:"));
    assert!(err.contains("Abandoned"));
}

#[test]
fn output_file_round_trips_through_replay_and_stats() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("logs").join("matches.jsonl");
    let log_str = log.to_str().unwrap();

    for seed in ["1", "2", "3"] {
        let (code, _, err) = cf(
            &[
                "ann", "vs", "bob", "bo", "5", "--side-a", "h", "--side-b", "t", "--seed", seed,
                "--pace-ms", "0", "--output", log_str,
            ],
            "",
        );
        assert_eq!(code, 0, "stderr: {}", err);
    }

    let content = fs::read_to_string(&log).unwrap();
    let records: Vec<MatchRecord> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].seed, Some(1));
    assert!(records.iter().all(|r| r.result.is_some()));

    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(
        ["coinduel", "replay", "--input", log_str],
        &mut out,
        &mut err,
    );
    assert_eq!(code, 0);
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Replayed 3 match(es): 3 verified, 0 failed"));

    let mut out = Vec::new();
    let code = run(["coinduel", "stats", "--input", log_str], &mut out, &mut err);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["matches"], 3);
    assert_eq!(json["modes"]["best_of"], 3);
}

#[test]
fn tampered_record_fails_replay() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("m.jsonl");
    let log_str = log.to_str().unwrap();
    let (code, _, _) = cf(
        &[
            "ann", "vs", "bob", "ft", "2", "--side-a", "h", "--side-b", "t", "--seed", "9",
            "--pace-ms", "0", "--output", log_str,
        ],
        "",
    );
    assert_eq!(code, 0);

    let mut rec: MatchRecord =
        serde_json::from_str(fs::read_to_string(&log).unwrap().trim()).unwrap();
    rec.score_a += 1;
    fs::write(&log, format!("{}\n", serde_json::to_string(&rec).unwrap())).unwrap();

    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["coinduel", "replay", "--input", log_str], &mut out, &mut err);
    assert_eq!(code, 2);
    assert!(String::from_utf8(out).unwrap().contains("MISMATCH"));
}

#[test]
fn flip_prints_a_face() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["coinduel", "flip", "--seed", "1"], &mut out, &mut err);
    assert_eq!(code, 0);
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("The coin landed on "));
}

#[test]
fn mention_and_lookalike_name_replay_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("m.jsonl");
    let log_str = log.to_str().unwrap();
    let (code, out, err) = cf(
        &[
            "<@12>", "vs", "@12", "ft", "2", "--side-a", "h", "--side-b", "t", "--seed", "4",
            "--pace-ms", "0", "--output", log_str,
        ],
        "",
    );
    assert_eq!(code, 0, "stderr: {}", err);
    assert!(out.starts_with("<@12> (HEADS) vs @12 (TAILS) - First to 2\n"));

    let rec: MatchRecord = serde_json::from_str(fs::read_to_string(&log).unwrap().trim()).unwrap();
    assert_eq!(rec.participant_a, "<@12>");
    assert_eq!(rec.participant_b, "@12");

    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["coinduel", "replay", "--input", log_str], &mut out, &mut err);
    assert_eq!(code, 0, "stderr: {}", String::from_utf8_lossy(&err));
    assert!(String::from_utf8(out).unwrap().contains("1 verified, 0 failed"));
}
