//! Match configuration
//!
//! Handed over by the menu shell as JSON when a match starts.

use serde::{Deserialize, Serialize};

use crate::consts::ROSTER_SIZE;

/// How many roster slots are driven by keyboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum HumanCount {
    #[default]
    Two,
    Three,
}

impl HumanCount {
    pub fn get(self) -> usize {
        match self {
            HumanCount::Two => 2,
            HumanCount::Three => 3,
        }
    }

    /// Number of bot slots left over in the roster
    pub fn bots(self) -> usize {
        ROSTER_SIZE - self.get()
    }
}

impl TryFrom<u8> for HumanCount {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(HumanCount::Two),
            3 => Ok(HumanCount::Three),
            n => Err(format!("human count must be 2 or 3, got {n}")),
        }
    }
}

impl From<HumanCount> for u8 {
    fn from(count: HumanCount) -> u8 {
        count.get() as u8
    }
}

/// Match setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    pub human_count: HumanCount,
    /// Bots spawn frozen and rounds never end the match
    #[serde(default)]
    pub is_test_mode: bool,
}

impl MatchConfig {
    pub fn new(human_count: HumanCount) -> Self {
        Self {
            human_count,
            is_test_mode: false,
        }
    }

    pub fn test_mode(mut self) -> Self {
        self.is_test_mode = true;
        self
    }

    /// Decode the menu shell's JSON payload
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
