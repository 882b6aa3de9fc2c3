use std::fs;

use coinduel_cli::run;
use serial_test::serial;

const VARS: [&str; 5] = [
    "COINDUEL_CONFIG",
    "COINDUEL_SEED",
    "COINDUEL_PACE_MS",
    "COINDUEL_RECENT_ROUNDS",
    "COINDUEL_DB",
];

fn clear_env() {
    for v in VARS {
        unsafe {
            std::env::remove_var(v);
        }
    }
}

fn cfg() -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["coinduel", "cfg"], &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
#[serial]
fn cfg_shows_defaults() {
    clear_env();
    let (code, out, _) = cfg();
    assert_eq!(code, 0);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["pace_ms"]["value"], 1500);
    assert_eq!(v["pace_ms"]["source"], "default");
    assert!(v["seed"]["value"].is_null());
    assert_eq!(v["database"]["value"], "coinduel.db");
}

#[test]
#[serial]
fn env_beats_file_beats_default() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("coinduel.toml");
    fs::write(&file, "pace_ms = 200\nseed = 7\n").unwrap();
    unsafe {
        std::env::set_var("COINDUEL_CONFIG", &file);
        std::env::set_var("COINDUEL_SEED", "8");
    }
    let (code, out, _) = cfg();
    clear_env();
    assert_eq!(code, 0);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["pace_ms"]["value"], 200);
    assert_eq!(v["pace_ms"]["source"], "file");
    assert_eq!(v["seed"]["value"], 8);
    assert_eq!(v["seed"]["source"], "env");
    assert_eq!(v["recent_rounds"]["source"], "default");
}

#[test]
#[serial]
fn unknown_file_key_is_a_config_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("coinduel.toml");
    fs::write(&file, "hands = 3\n").unwrap();
    unsafe {
        std::env::set_var("COINDUEL_CONFIG", &file);
    }
    let (code, _, err) = cfg();
    clear_env();
    assert_eq!(code, 2);
    assert!(err.contains("Invalid configuration"));
}

#[test]
#[serial]
fn configured_seed_drives_flip() {
    clear_env();
    unsafe {
        std::env::set_var("COINDUEL_SEED", "31");
    }
    let flip = || {
        let mut out = Vec::new();
        let mut err = Vec::new();
        assert_eq!(run(["coinduel", "flip"], &mut out, &mut err), 0);
        String::from_utf8(out).unwrap()
    };
    let first = flip();
    let second = flip();
    clear_env();
    assert_eq!(first, second);
}
