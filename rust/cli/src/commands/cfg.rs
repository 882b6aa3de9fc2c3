//! Configuration command handler.
//!
//! Prints the resolved configuration as pretty JSON, one `{value, source}`
//! object per key:
//!
//! ```json
//! {
//!   "pace_ms": { "value": 1500, "source": "default" },
//!   "seed": { "value": null, "source": "default" },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()
        .map_err(|e| CliError::Config(format!("Invalid configuration: {}", e)))?;

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "pace_ms": {
            "value": config.pace_ms,
            "source": sources.pace_ms,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "recent_rounds": {
            "value": config.recent_rounds,
            "source": sources.recent_rounds,
        },
        "database": {
            "value": config.database,
            "source": sources.database,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cfg_displays_json_output() {
        for v in [
            config::CONFIG_ENV,
            "COINDUEL_SEED",
            "COINDUEL_PACE_MS",
            "COINDUEL_RECENT_ROUNDS",
        ] {
            unsafe {
                std::env::remove_var(v);
            }
        }
        unsafe {
            std::env::set_var("COINDUEL_DB", "elsewhere.db");
        }
        let mut out = Vec::new();
        let result = handle_cfg_command(&mut out);
        unsafe {
            std::env::remove_var("COINDUEL_DB");
        }
        assert!(result.is_ok());

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains('\n'), "output should be pretty-printed");
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["pace_ms"]["value"], 1500);
        assert_eq!(json["pace_ms"]["source"], "default");
        assert_eq!(json["database"]["value"], "elsewhere.db");
        assert_eq!(json["database"]["source"], "env");
        assert!(json["seed"]["value"].is_null());
    }
}
