// ═══════════════════════════════════════════════════════════════════════
// Rules configuration — every tunable constant of the game
// ═══════════════════════════════════════════════════════════════════════

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// How a traded set is converted into armies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TradeScoring {
    /// Global tier sequence shared by all players. Past the table, each
    /// trade adds `increment` to the last listed value.
    Escalating { values: Vec<u32>, increment: u32 },
    /// Fixed value per completed pattern, independent of the tier. Trade
    /// values only never decrease under `Escalating`; here a later set can
    /// be worth less than an earlier one.
    BySet { infantry: u32, cavalry: u32, artillery: u32, mixed: u32 },
}

impl Default for TradeScoring {
    fn default() -> Self {
        TradeScoring::Escalating { values: vec![4, 6, 8, 10, 12, 15], increment: 5 }
    }
}

impl TradeScoring {
    pub fn by_set_defaults() -> Self {
        TradeScoring::BySet { infantry: 4, cavalry: 6, artillery: 8, mixed: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub draft_divisor: u32,
    pub draft_minimum: u32,
    pub trade_scoring: TradeScoring,
    pub territory_card_bonus: u32,
    pub forced_trade_hand_size: usize,
    pub wildcards: u32,
    /// Starting armies per player, indexed by `players - MIN_PLAYERS`.
    pub starting_armies: Vec<u32>,
    pub max_draft_rejections: u32,
    pub max_attacks_per_turn: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            draft_divisor: 3,
            draft_minimum: 3,
            trade_scoring: TradeScoring::default(),
            territory_card_bonus: 2,
            forced_trade_hand_size: 5,
            wildcards: 2,
            starting_armies: vec![40, 35, 30, 25, 20],
            max_draft_rejections: 3,
            max_attacks_per_turn: 250,
        }
    }
}

impl RulesConfig {
    /// Parse and validate. Missing keys take their default.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let rules: RulesConfig = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::InvalidRules(msg.to_string()))
        };

        if self.draft_divisor == 0 {
            return bad("draft_divisor must be positive");
        }
        if self.draft_minimum == 0 {
            return bad("draft_minimum must be positive");
        }
        // A 5-card hand always holds a set; a smaller limit could force
        // a trade that does not exist.
        if self.forced_trade_hand_size < 5 {
            return bad("forced_trade_hand_size must be at least 5");
        }
        if self.starting_armies.len() != MAX_PLAYERS - MIN_PLAYERS + 1 {
            return bad("starting_armies needs one entry per player count 2..=6");
        }
        if self.max_draft_rejections == 0 {
            return bad("max_draft_rejections must be positive");
        }
        if let TradeScoring::Escalating { values, .. } = &self.trade_scoring {
            if values.is_empty() {
                return bad("escalating trade values are empty");
            }
            if values.windows(2).any(|w| w[1] < w[0]) {
                return bad("escalating trade values must not decrease");
            }
        }
        Ok(())
    }

    pub fn starting_armies_for(&self, players: usize) -> Option<u32> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return None;
        }
        self.starting_armies.get(players - MIN_PLAYERS).copied()
    }
}
