//! Key/value desk settings (proof channel, tier roles and the like).

use std::io::Write;

use crate::cli::SettingsAction;
use crate::error::CliError;
use crate::store::DeskStore;

pub fn handle_settings_command(
    store: &DeskStore,
    action: SettingsAction,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match action {
        SettingsAction::Get { key } => match store.get_setting(&key)? {
            Some(value) => writeln!(out, "{}", value)?,
            None => {
                return Err(CliError::InvalidInput(format!(
                    "Setting '{}' is not configured",
                    key
                )));
            }
        },
        SettingsAction::Set { key, value } => {
            store.set_setting(&key, &value)?;
            writeln!(out, "{} = {}", key, value)?;
        }
        SettingsAction::List => {
            let settings = store.settings()?;
            if settings.is_empty() {
                writeln!(out, "No settings configured.")?;
            }
            for s in settings {
                writeln!(out, "{} = {} (updated {})", s.key, s.value, s.updated_at)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let store = DeskStore::open_in_memory().unwrap();
        let mut out = Vec::new();
        handle_settings_command(
            &store,
            SettingsAction::Set {
                key: "proof_channel".into(),
                value: "42".into(),
            },
            &mut out,
        )
        .unwrap();
        out.clear();
        handle_settings_command(
            &store,
            SettingsAction::Get {
                key: "proof_channel".into(),
            },
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "42\n");
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let store = DeskStore::open_in_memory().unwrap();
        let mut out = Vec::new();
        let res = handle_settings_command(&store, SettingsAction::Get { key: "x".into() }, &mut out);
        assert!(matches!(res, Err(CliError::InvalidInput(_))));
    }
}
