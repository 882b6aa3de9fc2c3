use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One face of the coin. Each participant backs one side for the whole match.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Heads,
    Tails,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Heads, Side::Tails];

    pub fn opposite(self) -> Side {
        match self {
            Side::Heads => Side::Tails,
            Side::Tails => Side::Heads,
        }
    }

    /// Maps a fair binary draw onto a side: 0 is heads, anything else tails.
    pub fn from_bit(bit: u32) -> Side {
        if bit == 0 {
            Side::Heads
        } else {
            Side::Tails
        }
    }

    /// Title-case name, e.g. `Heads`.
    pub fn name(self) -> &'static str {
        match self {
            Side::Heads => "Heads",
            Side::Tails => "Tails",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Heads => f.write_str("HEADS"),
            Side::Tails => f.write_str("TAILS"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "heads" => Ok(Side::Heads),
            "t" | "tails" => Ok(Side::Tails),
            other => Err(format!(
                "Unrecognized side '{}'. Choose heads or tails",
                other
            )),
        }
    }
}

/// Which of the two configured parties a value refers to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Seat {
    A,
    B,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::A => 0,
            Seat::B => 1,
        }
    }
}
