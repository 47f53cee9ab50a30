// ═══════════════════════════════════════════════════════════════════════
// Core types — ids, board state, players, pending decisions
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::Deck;
use crate::events::{EventLog, EventRecord, GameEvent};
use crate::map::MapGraph;
use crate::rules::RulesConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ── Ids ────────────────────────────────────────────────────────────────
// Compact, copyable identifiers. Each is an index into its owning Vec.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct PlayerId(pub u8);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct TerritoryId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ContinentId(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct CardId(pub u16);

// ── Enums ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Trade,
    Draft,
    Attack,
    Fortify,
    End,
}

impl Phase {
    pub const ALL: [Phase; 5] = [Phase::Trade, Phase::Draft, Phase::Attack, Phase::Fortify, Phase::End];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Trade => write!(f, "trade"),
            Phase::Draft => write!(f, "draft"),
            Phase::Attack => write!(f, "attack"),
            Phase::Fortify => write!(f, "fortify"),
            Phase::End => write!(f, "end"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardSymbol {
    Infantry,
    Cavalry,
    Artillery,
    Wildcard,
}

impl CardSymbol {
    /// The three symbols that make up a one-of-each set.
    pub const BASIC: [CardSymbol; 3] = [CardSymbol::Infantry, CardSymbol::Cavalry, CardSymbol::Artillery];

    pub fn is_wild(self) -> bool {
        self == CardSymbol::Wildcard
    }
}

// ── Card ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub symbol: CardSymbol,
    /// Territory printed on the card. Wildcards carry none.
    pub territory: Option<TerritoryId>,
}

// ── Territory (dynamic) ────────────────────────────────────────────────

/// Dynamic per-territory state. Static data (name, continent, neighbors)
/// lives in the shared `MapGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub struct TerritoryState {
    pub owner: Option<PlayerId>,
    pub armies: u32,
}

// ── Player ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,    // PRIVATE
    pub pool: u32,          // armies granted but not yet placed
    pub eliminated: bool,
}

// ── Orders ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOrder {
    pub from: TerritoryId,
    pub to: TerritoryId,
    /// Armies committed from `from`; must stay below the source's count.
    pub armies: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortifyOrder {
    pub from: TerritoryId,
    pub to: TerritoryId,
    pub armies: u32,
}

// ── Pending Decision Types ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingDecision {
    /// Trade a set of three cards, or decline. `forced` when the hand is full.
    Trade { player: PlayerId, forced: bool },
    /// Place armies from the pool.
    Draft { player: PlayerId, remaining: u32 },
    /// Attack from an owned territory, or stop attacking.
    Attack { player: PlayerId },
    /// After a conquest: move up to `max` extra armies from `from` into `to`.
    Occupy { player: PlayerId, from: TerritoryId, to: TerritoryId, max: u32 },
    /// One optional movement between connected owned territories.
    Fortify { player: PlayerId },
}

impl PendingDecision {
    pub fn player(&self) -> PlayerId {
        match self {
            PendingDecision::Trade { player, .. }
            | PendingDecision::Draft { player, .. }
            | PendingDecision::Attack { player }
            | PendingDecision::Occupy { player, .. }
            | PendingDecision::Fortify { player } => *player,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PendingDecision::Trade { .. } => "trade",
            PendingDecision::Draft { .. } => "draft",
            PendingDecision::Attack { .. } => "attack",
            PendingDecision::Occupy { .. } => "occupy",
            PendingDecision::Fortify { .. } => "fortify",
        }
    }
}

// ── Turn bookkeeping ───────────────────────────────────────────────────

/// Counters for the active player's turn. Reset at every End phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStats {
    pub trades: u32,
    pub armies_drafted: u32,
    pub draft_rejections: u32,
    pub attacks: u32,
    pub conquests: u32,
}

// ── Game State ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Static board, shared read-only between states and player views.
    pub map: Arc<MapGraph>,
    pub rules: RulesConfig,

    /// Dynamic state per territory, indexed by TerritoryId.
    pub territories: Vec<TerritoryState>,
    /// Players in turn order, indexed by PlayerId.
    pub players: Vec<PlayerState>,

    pub deck: Deck,
    /// Card count fixed at setup (conservation law).
    pub total_cards: usize,
    /// Successful trade-ins by anyone so far; selects the next set value.
    pub trades_completed: u32,

    /// Player turns started so far (1-based).
    pub turn: u32,
    /// Full passes over the turn order (1-based).
    pub round: u32,
    pub current_player: PlayerId,
    pub phase: Phase,
    pub turn_stats: TurnStats,

    // Current pending decision the game is waiting on
    pub pending: Option<PendingDecision>,

    pub log: EventLog,
}

impl GameState {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.0 as usize]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.0 as usize]
    }

    pub fn territory(&self, id: TerritoryId) -> &TerritoryState {
        &self.territories[id.0 as usize]
    }

    pub fn territory_mut(&mut self, id: TerritoryId) -> &mut TerritoryState {
        &mut self.territories[id.0 as usize]
    }

    /// Territory lookup that tolerates ids coming from untrusted decisions.
    pub fn get_territory(&self, id: TerritoryId) -> Option<&TerritoryState> {
        self.territories.get(id.0 as usize)
    }

    pub fn owned_territories(&self, player: PlayerId) -> Vec<TerritoryId> {
        self.territories.iter().enumerate()
            .filter(|(_, t)| t.owner == Some(player))
            .map(|(i, _)| TerritoryId(i as u16))
            .collect()
    }

    pub fn territory_count(&self, player: PlayerId) -> usize {
        self.territories.iter().filter(|t| t.owner == Some(player)).count()
    }

    pub fn armies_of(&self, player: PlayerId) -> u32 {
        self.territories.iter()
            .filter(|t| t.owner == Some(player))
            .map(|t| t.armies)
            .sum()
    }

    pub fn total_armies(&self) -> u32 {
        self.territories.iter().map(|t| t.armies).sum()
    }

    /// Cards currently accounted for: draw pile + discard pile + every hand.
    pub fn cards_in_play(&self) -> usize {
        self.deck.draw_pile.len()
            + self.deck.discard.len()
            + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
    }

    /// The player owning every territory of a continent, if any.
    pub fn continent_owner(&self, continent: ContinentId) -> Option<PlayerId> {
        let members = &self.map.continent(continent).territories;
        let first = self.territory(*members.first()?).owner?;
        members.iter()
            .all(|&t| self.territory(t).owner == Some(first))
            .then_some(first)
    }

    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.players.iter().filter(|p| !p.eliminated).map(|p| p.id).collect()
    }

    /// Append an event stamped with the current turn, player and phase.
    pub fn record(&mut self, event: GameEvent) {
        let record = EventRecord {
            seq: self.log.len() as u64,
            turn: self.turn,
            round: self.round,
            player: Some(self.current_player),
            phase: self.phase,
            event,
        };
        self.log.push(record);
    }
}
