// ═══════════════════════════════════════════════════════════════════════
// Visibility / Information Model
//
// Information in the board game is split between:
//   PUBLIC  — visible to all players at all times
//   PRIVATE — known only to the owning player
//   HIDDEN  — unknown to all players (deck order)
//
// This module produces a "player view" of the game state that only
// contains information that player is legally allowed to know.
// Agents MUST only receive PlayerView, never the raw GameState.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards;
use crate::map::MapGraph;
use crate::navigation;
use crate::rules::RulesConfig;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ── What is PUBLIC ─────────────────────────────────────────────────────
//
// • The map, every territory's owner and army count
// • Which continents are fully held, and by whom
// • Every player's hand SIZE, undrafted pool and elimination
// • Number of trade-ins so far (so the next set value)
// • Draw and discard pile sizes
// • Round, turn, current player and phase
//
// ── What is PRIVATE (per player) ───────────────────────────────────────
//
// • Your own cards
//
// ── What is HIDDEN (unknown to everyone) ───────────────────────────────
//
// • Order of the draw pile
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicPlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub cards_in_hand: usize,
    pub pool: u32,
    pub eliminated: bool,
    pub territories: usize,
    pub armies: u32,
}

/// The view of the game state that a specific player is allowed to see.
/// This is what gets passed to an Agent's decision functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    // ── Public info ────────────────────────────────────────
    pub viewer: PlayerId,
    pub turn: u32,
    pub round: u32,
    pub current_player: PlayerId,
    pub phase: Phase,

    pub map: Arc<MapGraph>,
    pub territories: Vec<TerritoryState>,
    pub players: Vec<PublicPlayerInfo>,
    /// Indexed by ContinentId.
    pub continent_owners: Vec<Option<PlayerId>>,

    pub rules: RulesConfig,
    pub trades_completed: u32,
    pub draw_pile_size: usize,
    pub discard_size: usize,

    /// Current pending decision (if it involves this player).
    pub pending: Option<PendingDecision>,

    // ── Private info ───────────────────────────────────────
    pub my_hand: Vec<Card>,
    pub my_pool: u32,
}

/// Build the view of `state` that `viewer` may see.
pub fn player_view(state: &GameState, viewer: PlayerId) -> PlayerView {
    let players = state.players.iter()
        .map(|p| PublicPlayerInfo {
            id: p.id,
            name: p.name.clone(),
            cards_in_hand: p.hand.len(),
            pool: p.pool,
            eliminated: p.eliminated,
            territories: state.territory_count(p.id),
            armies: state.armies_of(p.id),
        })
        .collect();

    let continent_owners = state.map.continents().iter()
        .map(|c| state.continent_owner(c.id))
        .collect();

    let pending = state.pending.clone().filter(|p| p.player() == viewer);
    let me = state.player(viewer);

    PlayerView {
        viewer,
        turn: state.turn,
        round: state.round,
        current_player: state.current_player,
        phase: state.phase,
        map: Arc::clone(&state.map),
        territories: state.territories.clone(),
        players,
        continent_owners,
        rules: state.rules.clone(),
        trades_completed: state.trades_completed,
        draw_pile_size: state.deck.len(),
        discard_size: state.deck.discard.len(),
        pending,
        my_hand: me.hand.clone(),
        my_pool: me.pool,
    }
}

impl PlayerView {
    pub fn owner(&self, t: TerritoryId) -> Option<PlayerId> {
        self.territories.get(t.0 as usize).and_then(|s| s.owner)
    }

    pub fn armies(&self, t: TerritoryId) -> u32 {
        self.territories.get(t.0 as usize).map_or(0, |s| s.armies)
    }

    pub fn owned(&self) -> Vec<TerritoryId> {
        self.map.territory_ids().filter(|&t| self.owner(t) == Some(self.viewer)).collect()
    }

    pub fn is_border(&self, t: TerritoryId) -> bool {
        navigation::is_border(&self.map, &self.territories, t)
    }

    pub fn attack_targets(&self, from: TerritoryId) -> Vec<TerritoryId> {
        navigation::attack_targets(&self.map, &self.territories, from)
    }

    pub fn attack_sources(&self) -> Vec<TerritoryId> {
        navigation::attack_sources(&self.map, &self.territories, self.viewer)
    }

    /// Owned territories reachable from `from` through own territory.
    pub fn reachable(&self, from: TerritoryId) -> Vec<TerritoryId> {
        navigation::reachable(&self.map, &self.territories, from, self.viewer)
    }

    pub fn is_connected(&self, from: TerritoryId, to: TerritoryId) -> bool {
        navigation::is_connected(&self.map, &self.territories, from, to, self.viewer)
    }

    /// Best tradeable set in the viewer's hand and its value right now.
    pub fn best_set(&self) -> Option<([CardId; 3], u32)> {
        cards::best_set(&self.my_hand, &self.rules.trade_scoring, self.trades_completed)
    }

    pub fn continents_held(&self) -> Vec<ContinentId> {
        self.map.continents().iter()
            .zip(&self.continent_owners)
            .filter(|(_, o)| **o == Some(self.viewer))
            .map(|(c, _)| c.id)
            .collect()
    }
}
