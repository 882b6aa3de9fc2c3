//! Input parsing and validation for the duel commands.
//!
//! - `cf` argument grammar (participants, the `vs` keyword, mode and rounds)
//! - Side choices typed at the interactive prompt

use coinduel_engine::rules::{MAX_ROUND_TARGET, VictoryCondition};
use coinduel_engine::side::Side;

/// Outcome of reading one answer at the side prompt.
#[derive(Debug, PartialEq)]
pub enum SideInput {
    Side(Side),
    /// `q` or `quit`
    Quit,
    Invalid(String),
}

/// Parse an answer to "choose heads or tails".
///
/// ```rust
/// # use coinduel_cli::validation::{parse_side_choice, SideInput};
/// use coinduel_engine::side::Side;
///
/// assert_eq!(parse_side_choice("H"), SideInput::Side(Side::Heads));
/// assert_eq!(parse_side_choice("tails"), SideInput::Side(Side::Tails));
/// assert_eq!(parse_side_choice("q"), SideInput::Quit);
/// assert!(matches!(parse_side_choice("edge"), SideInput::Invalid(_)));
/// ```
pub fn parse_side_choice(input: &str) -> SideInput {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "q" | "quit" => SideInput::Quit,
        "" => SideInput::Invalid("Empty input".to_string()),
        other => match other.parse::<Side>() {
            Ok(side) => SideInput::Side(side),
            Err(msg) => SideInput::Invalid(msg),
        },
    }
}

/// A duel participant as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Identity used for comparisons: the numeric id of a mention, or the
    /// lowercased name.
    pub key: String,
    /// Spelling shown in output
    pub display: String,
}

/// Normalise `<@123>`, `<@!123>` or a plain name.
///
/// A mention keeps the `<@id>` form for display, so it never reads the same
/// as a plain name; displays are the identities stored in match records.
pub fn parse_participant(raw: &str) -> Result<Participant, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Could not find user: (empty)".to_string());
    }
    if let Some(rest) = raw.strip_prefix("<@") {
        let id = rest
            .strip_suffix('>')
            .map(|inner| inner.trim_start_matches('!'))
            .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| format!("Could not find user: {}", raw))?;
        return Ok(Participant {
            key: id.to_string(),
            display: format!("<@{}>", id),
        });
    }
    Ok(Participant {
        key: raw.to_lowercase(),
        display: raw.to_string(),
    })
}

pub fn check_vs(word: &str) -> Result<(), String> {
    if word.eq_ignore_ascii_case("vs") {
        Ok(())
    } else {
        Err("Please use \"vs\" between usernames".to_string())
    }
}

/// Resolve the optional `[mode] [rounds]` pair into a victory condition.
///
/// No mode means a single flip. `ft`/`firstto` and `bo`/`bestof` need a
/// round count; a bare number in place of the mode means best-of that many.
///
/// ```rust
/// # use coinduel_cli::validation::parse_victory;
/// use coinduel_engine::rules::VictoryCondition;
///
/// assert_eq!(parse_victory(None, None), Ok(VictoryCondition::BestOf(1)));
/// assert_eq!(parse_victory(Some("FT"), Some("3")), Ok(VictoryCondition::FirstTo(3)));
/// assert_eq!(parse_victory(Some("7"), None), Ok(VictoryCondition::BestOf(7)));
/// assert!(parse_victory(Some("bo"), Some("201")).is_err());
/// ```
pub fn parse_victory(mode: Option<&str>, rounds: Option<&str>) -> Result<VictoryCondition, String> {
    let invalid_mode = || "Invalid mode! Use \"ft\" or \"bo\".".to_string();
    let Some(tag) = mode.map(str::trim) else {
        return Ok(VictoryCondition::BestOf(1));
    };
    if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_digit()) {
        return Ok(VictoryCondition::BestOf(parse_rounds(tag)?));
    }
    let short = match VictoryCondition::from_tag(tag, 0).map_err(|_| invalid_mode())? {
        VictoryCondition::FirstTo(_) => "ft",
        VictoryCondition::BestOf(_) => "bo",
    };
    let Some(rounds) = rounds else {
        return Err(format!("Specify rounds for \"{}\" mode", short));
    };
    VictoryCondition::from_tag(tag, parse_rounds(rounds)?).map_err(|_| invalid_mode())
}

fn parse_rounds(raw: &str) -> Result<u32, String> {
    let out_of_range = || format!("Rounds must be between 1 and {}", MAX_ROUND_TARGET);
    let n: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("Rounds must be a number, got '{}'", raw))?;
    if !(1..=MAX_ROUND_TARGET as i64).contains(&n) {
        return Err(out_of_range());
    }
    u32::try_from(n).map_err(|_| out_of_range())
}

/// Parsed `cf <user1> vs <user2> [mode] [rounds]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelRequest {
    pub first: Participant,
    pub second: Participant,
    pub victory: VictoryCondition,
}

pub fn parse_duel(
    user1: &str,
    vs: &str,
    user2: &str,
    mode: Option<&str>,
    rounds: Option<&str>,
) -> Result<DuelRequest, String> {
    check_vs(vs)?;
    let first = parse_participant(user1)?;
    let second = parse_participant(user2)?;
    if first.key == second.key {
        return Err(format!("{} cannot duel themselves", first.display));
    }
    let victory = parse_victory(mode, rounds)?;
    Ok(DuelRequest {
        first,
        second,
        victory,
    })
}
