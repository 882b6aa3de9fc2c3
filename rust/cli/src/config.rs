use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_ENV: &str = "COINDUEL_CONFIG";
pub const MAX_PACE_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Delay between rendered rounds of a duel
    pub pace_ms: u64,
    pub seed: Option<u64>,
    /// Rounds shown in the progress line while a duel runs
    pub recent_rounds: usize,
    /// Desk store SQLite path
    pub database: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub pace_ms: ValueSource,
    pub seed: ValueSource,
    pub recent_rounds: ValueSource,
    pub database: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            pace_ms: ValueSource::Default,
            seed: ValueSource::Default,
            recent_rounds: ValueSource::Default,
            database: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pace_ms: 1500,
            seed: None,
            recent_rounds: 5,
            database: "coinduel.db".into(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the toml file named by `COINDUEL_CONFIG`, then `COINDUEL_*` overrides.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.pace_ms {
            cfg.pace_ms = v;
            sources.pace_ms = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.recent_rounds {
            cfg.recent_rounds = v;
            sources.recent_rounds = ValueSource::File;
        }
        if let Some(v) = f.database {
            cfg.database = v;
            sources.database = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("COINDUEL_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(pace) = std::env::var("COINDUEL_PACE_MS")
        && !pace.is_empty()
    {
        cfg.pace_ms = pace
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid pace_ms".into()))?;
        sources.pace_ms = ValueSource::Env;
    }
    if let Ok(recent) = std::env::var("COINDUEL_RECENT_ROUNDS")
        && !recent.is_empty()
    {
        cfg.recent_rounds = recent
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid recent_rounds".into()))?;
        sources.recent_rounds = ValueSource::Env;
    }
    if let Ok(db) = std::env::var("COINDUEL_DB")
        && !db.is_empty()
    {
        cfg.database = db;
        sources.database = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    pace_ms: Option<u64>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    recent_rounds: Option<usize>,
    #[serde(default)]
    database: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.pace_ms > MAX_PACE_MS {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: pace_ms must be <= {}",
            MAX_PACE_MS
        )));
    }
    if cfg.recent_rounds == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: recent_rounds must be >=1".into(),
        ));
    }
    if cfg.database.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "Invalid configuration: database must not be empty".into(),
        ));
    }
    Ok(())
}
