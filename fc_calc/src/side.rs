use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::CalcError;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Sign applied to price moves: +1 for long, -1 for short
    pub fn direction(self) -> f64 {
        match self {
            PositionSide::Long => 1.0,
            PositionSide::Short => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionSide {
    type Err = CalcError;

    /// Accepts `LONG`/`SHORT` (any case, with or without a leading emoji) and `BUY`/`SELL`
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let word = input.trim().trim_start_matches(|c: char| !c.is_ascii_alphabetic()).trim().to_ascii_uppercase();

        match word.as_str() {
            "LONG" | "BUY" => Ok(PositionSide::Long),
            "SHORT" | "SELL" => Ok(PositionSide::Short),
            _ => Err(CalcError::UnknownSide { input: input.trim().to_string() }),
        }
    }
}
