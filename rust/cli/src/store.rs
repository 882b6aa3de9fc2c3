//! Desk store: settings, tickets and responder statistics in SQLite.
//!
//! Every ticket and claim lives in the database; nothing is cached in
//! process state, so several CLI invocations can share one file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Setting naming the channel where completed trades are posted.
pub const PROOF_CHANNEL: &str = "proof_channel";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Ticket {0} already exists")]
    TicketExists(String),
    #[error("Ticket {0} not found")]
    TicketNotFound(String),
    #[error("Ticket already claimed by {0}")]
    AlreadyClaimed(String),
    #[error("Ticket {0} is not claimed")]
    NotClaimed(String),
    #[error("Only the claimer or an admin can unclaim ticket {0}")]
    NotClaimant(String),
    #[error("Proof channel not configured! Set it with: settings set proof_channel <channel>")]
    ProofChannelMissing,
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),
}

/// Trade value band of a middleman ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    #[serde(rename = "1_50")]
    UpTo50,
    #[serde(rename = "50_100")]
    UpTo100,
    #[serde(rename = "100_250")]
    UpTo250,
    #[serde(rename = "250_plus")]
    Over250,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::UpTo50, Tier::UpTo100, Tier::UpTo250, Tier::Over250];

    pub fn key(self) -> &'static str {
        match self {
            Tier::UpTo50 => "1_50",
            Tier::UpTo100 => "50_100",
            Tier::UpTo250 => "100_250",
            Tier::Over250 => "250_plus",
        }
    }

    pub fn range(self) -> &'static str {
        match self {
            Tier::UpTo50 => "$1-$50",
            Tier::UpTo100 => "$50-$100",
            Tier::UpTo250 => "$100-$250",
            Tier::Over250 => "$250+",
        }
    }
}

impl FromStr for Tier {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| {
                StoreError::InvalidValue(format!(
                    "unknown tier '{}' (expected 1_50, 50_100, 100_250 or 250_plus)",
                    s
                ))
            })
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Claimed,
}

impl TicketStatus {
    fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Claimed => "claimed",
        }
    }
}

/// What the ticket was opened for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TicketDetails {
    Middleman {
        tier: Tier,
        trader: String,
        giving: String,
        receiving: String,
        both_join: bool,
        tip: Option<String>,
    },
    Support {
        reason: String,
        details: Option<String>,
    },
}

impl TicketDetails {
    fn kind(&self) -> &'static str {
        match self {
            TicketDetails::Middleman { .. } => "middleman",
            TicketDetails::Support { .. } => "support",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub channel_id: String,
    pub creator: String,
    #[serde(flatten)]
    pub details: TicketDetails,
    pub claimed_by: Option<String>,
    pub status: TicketStatus,
    pub created_at: String,
}

/// Completed-ticket count of one responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponderStats {
    pub user_id: String,
    pub tickets_completed: u64,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS bot_config (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tickets (
    channel_id TEXT PRIMARY KEY,
    creator TEXT NOT NULL,
    kind TEXT NOT NULL,
    tier TEXT,
    trader TEXT,
    giving TEXT,
    receiving TEXT,
    both_join INTEGER,
    tip TEXT,
    reason TEXT,
    details TEXT,
    claimed_by TEXT,
    status TEXT NOT NULL DEFAULT 'open',
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS mm_stats (
    user_id TEXT PRIMARY KEY,
    tickets_completed INTEGER NOT NULL DEFAULT 0,
    last_updated TEXT NOT NULL
);
";

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn required(value: &str, what: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidValue(format!("{} must not be empty", what)));
    }
    Ok(())
}

#[derive(Debug)]
pub struct DeskStore {
    conn: Connection,
}

impl DeskStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        fetch_setting(&self.conn, key)
    }

    /// Inserts or replaces a setting.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        required(key, "setting key")?;
        self.conn.execute(
            "INSERT INTO bot_config (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now()],
        )?;
        debug!(key, "setting stored");
        Ok(())
    }

    pub fn settings(&self) -> Result<Vec<Setting>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value, updated_at FROM bot_config ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok(Setting {
                key: row.get(0)?,
                value: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn open_ticket(
        &mut self,
        channel_id: &str,
        creator: &str,
        details: TicketDetails,
    ) -> Result<Ticket, StoreError> {
        required(channel_id, "channel id")?;
        required(creator, "creator")?;
        match &details {
            TicketDetails::Middleman {
                trader,
                giving,
                receiving,
                ..
            } => {
                required(trader, "trader")?;
                required(giving, "giving")?;
                required(receiving, "receiving")?;
            }
            TicketDetails::Support { reason, .. } => required(reason, "reason")?,
        }

        let tx = self.conn.transaction()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM tickets WHERE channel_id = ?1)",
            params![channel_id],
            |row| row.get(0),
        )?;
        if exists {
            return Err(StoreError::TicketExists(channel_id.to_string()));
        }

        let ticket = Ticket {
            channel_id: channel_id.to_string(),
            creator: creator.to_string(),
            details,
            claimed_by: None,
            status: TicketStatus::Open,
            created_at: now(),
        };
        let (tier, trader, giving, receiving, both_join, tip, reason, extra) = match &ticket.details
        {
            TicketDetails::Middleman {
                tier,
                trader,
                giving,
                receiving,
                both_join,
                tip,
            } => (
                Some(tier.key()),
                Some(trader.as_str()),
                Some(giving.as_str()),
                Some(receiving.as_str()),
                Some(*both_join),
                tip.as_deref(),
                None,
                None,
            ),
            TicketDetails::Support { reason, details } => (
                None,
                None,
                None,
                None,
                None,
                None,
                Some(reason.as_str()),
                details.as_deref(),
            ),
        };
        tx.execute(
            "INSERT INTO tickets (channel_id, creator, kind, tier, trader, giving, receiving,
                                  both_join, tip, reason, details, claimed_by, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, NULL, ?12, ?13)",
            params![
                ticket.channel_id,
                ticket.creator,
                ticket.details.kind(),
                tier,
                trader,
                giving,
                receiving,
                both_join,
                tip,
                reason,
                extra,
                ticket.status.as_str(),
                ticket.created_at,
            ],
        )?;
        tx.commit()?;
        info!(channel = channel_id, kind = ticket.details.kind(), "ticket opened");
        Ok(ticket)
    }

    pub fn ticket(&self, channel_id: &str) -> Result<Ticket, StoreError> {
        fetch_ticket(&self.conn, channel_id)?
            .ok_or_else(|| StoreError::TicketNotFound(channel_id.to_string()))
    }

    pub fn claim(&mut self, channel_id: &str, user: &str) -> Result<Ticket, StoreError> {
        required(user, "user")?;
        let tx = self.conn.transaction()?;
        let mut ticket = fetch_ticket(&tx, channel_id)?
            .ok_or_else(|| StoreError::TicketNotFound(channel_id.to_string()))?;
        if let Some(holder) = &ticket.claimed_by {
            return Err(StoreError::AlreadyClaimed(holder.clone()));
        }
        tx.execute(
            "UPDATE tickets SET claimed_by = ?1, status = 'claimed' WHERE channel_id = ?2",
            params![user, channel_id],
        )?;
        tx.commit()?;
        ticket.claimed_by = Some(user.to_string());
        ticket.status = TicketStatus::Claimed;
        info!(channel = channel_id, user, "ticket claimed");
        Ok(ticket)
    }

    /// Releases a claim. Only the claimant may do so unless `admin` is set.
    pub fn unclaim(&mut self, channel_id: &str, user: &str, admin: bool) -> Result<Ticket, StoreError> {
        let tx = self.conn.transaction()?;
        let mut ticket = fetch_ticket(&tx, channel_id)?
            .ok_or_else(|| StoreError::TicketNotFound(channel_id.to_string()))?;
        match ticket.claimed_by.as_deref() {
            None => return Err(StoreError::NotClaimed(channel_id.to_string())),
            Some(holder) if holder != user && !admin => {
                return Err(StoreError::NotClaimant(channel_id.to_string()));
            }
            Some(_) => {}
        }
        tx.execute(
            "UPDATE tickets SET claimed_by = NULL, status = 'open' WHERE channel_id = ?1",
            params![channel_id],
        )?;
        tx.commit()?;
        ticket.claimed_by = None;
        ticket.status = TicketStatus::Open;
        info!(channel = channel_id, user, admin, "ticket unclaimed");
        Ok(ticket)
    }

    /// Removes the ticket and returns it as it was.
    pub fn close(&mut self, channel_id: &str) -> Result<Ticket, StoreError> {
        let tx = self.conn.transaction()?;
        let ticket = fetch_ticket(&tx, channel_id)?
            .ok_or_else(|| StoreError::TicketNotFound(channel_id.to_string()))?;
        tx.execute("DELETE FROM tickets WHERE channel_id = ?1", params![channel_id])?;
        tx.commit()?;
        info!(channel = channel_id, "ticket closed");
        Ok(ticket)
    }

    /// Credits `user` with one completed ticket for `channel_id`.
    ///
    /// Refused until the [`PROOF_CHANNEL`] setting names a channel.
    pub fn complete(&mut self, channel_id: &str, user: &str) -> Result<ResponderStats, StoreError> {
        required(user, "user")?;
        let tx = self.conn.transaction()?;
        if fetch_ticket(&tx, channel_id)?.is_none() {
            return Err(StoreError::TicketNotFound(channel_id.to_string()));
        }
        match fetch_setting(&tx, PROOF_CHANNEL)?.as_deref().map(str::trim) {
            None | Some("") | Some("0") => return Err(StoreError::ProofChannelMissing),
            Some(_) => {}
        }
        tx.execute(
            "INSERT INTO mm_stats (user_id, tickets_completed, last_updated) VALUES (?1, 1, ?2)
             ON CONFLICT (user_id) DO UPDATE SET
                 tickets_completed = mm_stats.tickets_completed + 1,
                 last_updated = excluded.last_updated",
            params![user, now()],
        )?;
        let stats = fetch_stats(&tx, user)?
            .ok_or_else(|| StoreError::InvalidValue(format!("no stats recorded for {}", user)))?;
        tx.commit()?;
        info!(channel = channel_id, user, total = stats.tickets_completed, "ticket completed");
        Ok(stats)
    }

    pub fn responder_stats(&self, user: &str) -> Result<Option<ResponderStats>, StoreError> {
        fetch_stats(&self.conn, user)
    }

    /// 1 + number of responders with strictly more completions, or `None`
    /// when the user has never completed a ticket.
    pub fn rank(&self, user: &str) -> Result<Option<u64>, StoreError> {
        let Some(stats) = fetch_stats(&self.conn, user)? else {
            return Ok(None);
        };
        let ahead: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM mm_stats WHERE tickets_completed > ?1",
            params![stats.tickets_completed as i64],
            |row| row.get(0),
        )?;
        Ok(Some(ahead as u64 + 1))
    }

    pub fn leaderboard(&self, limit: usize) -> Result<Vec<ResponderStats>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, tickets_completed, last_updated FROM mm_stats
             ORDER BY tickets_completed DESC, user_id ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], stats_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn stats_from_row(row: &Row<'_>) -> rusqlite::Result<ResponderStats> {
    let count: i64 = row.get(1)?;
    Ok(ResponderStats {
        user_id: row.get(0)?,
        tickets_completed: count.max(0) as u64,
        last_updated: row.get(2)?,
    })
}

fn fetch_setting(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT value FROM bot_config WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?)
}

fn fetch_stats(conn: &Connection, user: &str) -> Result<Option<ResponderStats>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT user_id, tickets_completed, last_updated FROM mm_stats WHERE user_id = ?1",
            params![user],
            stats_from_row,
        )
        .optional()?)
}

struct TicketRow {
    channel_id: String,
    creator: String,
    kind: String,
    tier: Option<String>,
    trader: Option<String>,
    giving: Option<String>,
    receiving: Option<String>,
    both_join: Option<bool>,
    tip: Option<String>,
    reason: Option<String>,
    details: Option<String>,
    claimed_by: Option<String>,
    status: String,
    created_at: String,
}

fn fetch_ticket(conn: &Connection, channel_id: &str) -> Result<Option<Ticket>, StoreError> {
    let row = conn
        .query_row(
            "SELECT channel_id, creator, kind, tier, trader, giving, receiving, both_join, tip,
                    reason, details, claimed_by, status, created_at
             FROM tickets WHERE channel_id = ?1",
            params![channel_id],
            |row| {
                Ok(TicketRow {
                    channel_id: row.get(0)?,
                    creator: row.get(1)?,
                    kind: row.get(2)?,
                    tier: row.get(3)?,
                    trader: row.get(4)?,
                    giving: row.get(5)?,
                    receiving: row.get(6)?,
                    both_join: row.get(7)?,
                    tip: row.get(8)?,
                    reason: row.get(9)?,
                    details: row.get(10)?,
                    claimed_by: row.get(11)?,
                    status: row.get(12)?,
                    created_at: row.get(13)?,
                })
            },
        )
        .optional()?;
    row.map(ticket_from_row).transpose()
}

fn ticket_from_row(row: TicketRow) -> Result<Ticket, StoreError> {
    let details = match row.kind.as_str() {
        "middleman" => TicketDetails::Middleman {
            tier: row.tier.as_deref().unwrap_or_default().parse()?,
            trader: row.trader.unwrap_or_default(),
            giving: row.giving.unwrap_or_default(),
            receiving: row.receiving.unwrap_or_default(),
            both_join: row.both_join.unwrap_or(false),
            tip: row.tip,
        },
        "support" => TicketDetails::Support {
            reason: row.reason.unwrap_or_default(),
            details: row.details,
        },
        other => {
            return Err(StoreError::InvalidValue(format!(
                "unknown ticket kind '{}'",
                other
            )));
        }
    };
    let status = match row.status.as_str() {
        "claimed" => TicketStatus::Claimed,
        _ => TicketStatus::Open,
    };
    Ok(Ticket {
        channel_id: row.channel_id,
        creator: row.creator,
        details,
        claimed_by: row.claimed_by,
        status,
        created_at: row.created_at,
    })
}
