// ═══════════════════════════════════════════════════════════════════════
// Errors — fatal configuration failures and rejected player decisions
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{CardId, PlayerId, TerritoryId};
use thiserror::Error;

/// Raised while building a map, rules or initial state. Nothing is
/// simulated once one of these is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("map has no territories")]
    EmptyMap,

    #[error("territory `{territory}` references unknown continent `{continent}`")]
    UnknownContinent { territory: String, continent: String },

    #[error("territory `{territory}` lists unknown neighbor `{neighbor}`")]
    UnknownNeighbor { territory: String, neighbor: String },

    #[error("territory `{0}` lists itself as a neighbor")]
    SelfBorder(String),

    #[error("border `{from}` -> `{to}` is not mirrored by `{to}`")]
    AsymmetricBorder { from: String, to: String },

    #[error("continent `{continent}` lists unknown territory `{territory}`")]
    UnknownMember { continent: String, territory: String },

    #[error("continent `{continent}` lists `{territory}` more than once")]
    DuplicateMember { continent: String, territory: String },

    #[error("territory `{territory}` declares continent `{declared}` but is listed by `{listed_by}`")]
    ContinentMismatch { territory: String, declared: String, listed_by: String },

    #[error("territory `{territory}` is missing from the member list of `{continent}`")]
    MissingMember { territory: String, continent: String },

    #[error("map has {continents} continents and {territories} territories, more than ids can address")]
    MapTooLarge { continents: usize, territories: usize },

    #[error("deck of {cards} cards is more than card ids can address")]
    DeckTooLarge { cards: usize },

    #[error("invalid rules: {0}")]
    InvalidRules(String),

    #[error("player count {count} outside {min}..={max}")]
    InvalidPlayerCount { count: usize, min: usize, max: usize },

    #[error("map has {territories} territories, fewer than {players} players")]
    NotEnoughTerritories { territories: usize, players: usize },

    #[error("invalid territory assignment: {0}")]
    InvalidAssignment(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A decision that breaks a game rule. The state machine rejects it without
/// touching the state and treats it as a pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("no decision is pending")]
    NoPendingDecision,

    #[error("expected a {expected} decision, got {got}")]
    UnexpectedAction { expected: &'static str, got: &'static str },

    // ── Cards ──
    #[error("card {0:?} chosen more than once")]
    DuplicateCard(CardId),

    #[error("card {0:?} is not in the player's hand")]
    CardNotInHand(CardId),

    #[error("cards do not form a tradeable set")]
    InvalidSet,

    // ── Territories ──
    #[error("territory {0:?} does not exist")]
    UnknownTerritory(TerritoryId),

    #[error("territory {territory:?} is not owned by {player}")]
    NotOwned { territory: TerritoryId, player: PlayerId },

    // ── Draft ──
    #[error("must place at least one army")]
    ZeroArmies,

    #[error("placing {requested} armies exceeds the remaining pool of {available}")]
    ExceedsPool { requested: u32, available: u32 },

    // ── Attack ──
    #[error("territory {0:?} needs more than one army to attack")]
    SourceTooWeak(TerritoryId),

    #[error("territory {0:?} is not an enemy territory")]
    NotAnEnemy(TerritoryId),

    #[error("{from:?} does not border {to:?}")]
    NotAdjacent { from: TerritoryId, to: TerritoryId },

    #[error("cannot attack with {armies} armies from a territory holding {available}")]
    InvalidArmyCount { armies: u32, available: u32 },

    #[error("cannot move {requested} extra armies after a conquest, at most {max}")]
    OccupationExceeded { requested: u32, max: u32 },

    // ── Fortify ──
    #[error("source and destination are the same territory")]
    SameTerritory,

    #[error("no path of owned territory from {from:?} to {to:?}")]
    NoOwnedPath { from: TerritoryId, to: TerritoryId },

    #[error("moving {armies} armies would leave {from:?} without a garrison")]
    WouldEmptySource { from: TerritoryId, armies: u32 },
}
