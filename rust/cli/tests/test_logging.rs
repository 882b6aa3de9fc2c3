use std::fs;

use coinduel_cli::logging::init_test_logging;
use coinduel_cli::run;
use serial_test::serial;
use tracing::Level;

#[test]
#[serial]
fn desk_mutations_are_logged() {
    let logs = init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("desk.db");
    let db = db.to_str().unwrap();

    let mut out = Vec::new();
    let mut err = Vec::new();
    for args in [
        vec!["coinduel", "ticket", "open-support", "--channel", "c1", "--creator", "ann", "--reason", "help", "--db", db],
        vec!["coinduel", "ticket", "claim", "--channel", "c1", "--user", "zed", "--db", db],
    ] {
        assert_eq!(run(args, &mut out, &mut err), 0);
    }

    let claimed = logs.matching("ticket claimed");
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].level, Level::INFO);
    assert!(claimed[0].fields.iter().any(|(k, v)| k == "user" && v.contains("zed")));
}

#[test]
#[serial]
fn replay_mismatch_is_warned() {
    let logs = init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.jsonl");
    let path = path.to_str().unwrap();

    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut stdin = std::io::Cursor::new(Vec::new());
    let code = coinduel_cli::run_with_input(
        [
            "coinduel", "cf", "ann", "vs", "bob", "ft", "2", "--side-a", "h", "--side-b", "t",
            "--seed", "4", "--pace-ms", "0", "--output", path,
        ],
        &mut out,
        &mut err,
        &mut stdin,
    );
    assert_eq!(code, 0);
    assert_eq!(logs.matching("duel finished").len(), 1);

    let line = fs::read_to_string(path).unwrap();
    let mut rec: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    rec["draws"].as_array_mut().unwrap().push(serde_json::json!(0));
    fs::write(path, format!("{}\n", rec)).unwrap();

    let code = run(["coinduel", "replay", "--input", path], &mut out, &mut err);
    assert_eq!(code, 2);
    let warned = logs.matching("replay mismatch");
    assert_eq!(warned.len(), 1);
    assert_eq!(warned[0].level, Level::WARN);
}
