//! Single coin flip.

use std::io::Write;

use coinduel_engine::coin::{OsCoin, SeededCoin, flip};
use tracing::debug;

use crate::error::CliError;

/// Flip one fair coin and print the face.
///
/// A seed (flag first, then configuration) makes the flip reproducible.
pub fn handle_flip_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let seed = match seed {
        Some(s) => Some(s),
        None => crate::config::load()
            .map_err(|e| CliError::Config(e.to_string()))?
            .seed,
    };
    let side = match seed {
        Some(s) => flip(SeededCoin::new_with_seed(s))?,
        None => flip(OsCoin)?,
    };
    debug!(?seed, ?side, "coin flipped");
    writeln!(out, "The coin landed on {}!", side.name())?;
    Ok(())
}
