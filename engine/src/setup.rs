// ═══════════════════════════════════════════════════════════════════════
// Game setup — creates the initial GameState for N players
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{build_deck, Deck};
use crate::error::ConfigError;
use crate::events::{EventLog, GameEvent};
use crate::map::MapGraph;
use crate::rules::{RulesConfig, MAX_PLAYERS, MIN_PLAYERS};
use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::info;

/// Shuffle the territories and deal them round-robin in blocks: every
/// player gets `n / players`, the first `n % players` get one more. Each
/// territory starts with one army and the rest of every player's starting
/// armies are scattered one at a time over their territories.
pub fn create_initial_state<R: Rng + ?Sized>(
    map: Arc<MapGraph>,
    player_names: &[String],
    rules: RulesConfig,
    rng: &mut R,
) -> Result<GameState, ConfigError> {
    check_roster(&map, player_names.len(), &rules)?;
    let players = player_names.len();

    let mut order: Vec<TerritoryId> = map.territory_ids().collect();
    order.shuffle(rng);

    let per = order.len() / players;
    let extra = order.len() % players;
    let mut owners = vec![PlayerId(0); order.len()];
    let mut deal = order.into_iter();
    for p in 0..players {
        let share = per + usize::from(p < extra);
        for t in deal.by_ref().take(share) {
            owners[t.0 as usize] = PlayerId(p as u8);
        }
    }

    build_state(map, player_names, &owners, rules, rng)
}

/// Like `create_initial_state` but with a fixed owner per territory
/// (indexed by TerritoryId). Armies are still scattered with `rng`.
pub fn create_state_with_assignment<R: Rng + ?Sized>(
    map: Arc<MapGraph>,
    player_names: &[String],
    owners: &[PlayerId],
    rules: RulesConfig,
    rng: &mut R,
) -> Result<GameState, ConfigError> {
    check_roster(&map, player_names.len(), &rules)?;
    let players = player_names.len();

    if owners.len() != map.territory_count() {
        return Err(ConfigError::InvalidAssignment(format!(
            "{} owners for {} territories", owners.len(), map.territory_count()
        )));
    }
    if let Some(bad) = owners.iter().find(|o| o.0 as usize >= players) {
        return Err(ConfigError::InvalidAssignment(format!("{bad} is not seated")));
    }
    for p in 0..players {
        if !owners.contains(&PlayerId(p as u8)) {
            return Err(ConfigError::InvalidAssignment(format!("{} owns no territory", PlayerId(p as u8))));
        }
    }

    build_state(map, player_names, owners, rules, rng)
}

fn check_roster(map: &MapGraph, players: usize, rules: &RulesConfig) -> Result<(), ConfigError> {
    rules.validate()?;
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        return Err(ConfigError::InvalidPlayerCount { count: players, min: MIN_PLAYERS, max: MAX_PLAYERS });
    }
    if map.territory_count() < players {
        return Err(ConfigError::NotEnoughTerritories { territories: map.territory_count(), players });
    }
    Ok(())
}

fn build_state<R: Rng + ?Sized>(
    map: Arc<MapGraph>,
    player_names: &[String],
    owners: &[PlayerId],
    rules: RulesConfig,
    rng: &mut R,
) -> Result<GameState, ConfigError> {
    let count = player_names.len();
    let starting = rules.starting_armies_for(count)
        .ok_or(ConfigError::InvalidPlayerCount { count, min: MIN_PLAYERS, max: MAX_PLAYERS })?;

    let territories = owners.iter()
        .map(|&o| TerritoryState { owner: Some(o), armies: 1 })
        .collect();
    let players = player_names.iter().enumerate()
        .map(|(i, name)| PlayerState {
            id: PlayerId(i as u8),
            name: name.clone(),
            hand: Vec::new(),
            pool: 0,
            eliminated: false,
        })
        .collect();

    let mut deck = Deck::new(build_deck(&map, rules.wildcards)?);
    deck.shuffle(rng);
    let total_cards = deck.len();

    let mut state = GameState {
        map,
        rules,
        territories,
        players,
        deck,
        total_cards,
        trades_completed: 0,
        turn: 1,
        round: 1,
        current_player: PlayerId(0),
        phase: Phase::Trade,
        turn_stats: TurnStats::default(),
        pending: None,
        log: EventLog::default(),
    };

    state.record(GameEvent::GameStarted {
        players: player_names.to_vec(),
        territories: state.map.territory_count(),
        cards: total_cards,
    });
    for (i, &owner) in owners.iter().enumerate() {
        state.record(GameEvent::TerritoryAssigned { territory: TerritoryId(i as u16), player: owner });
    }

    for p in 0..count {
        let player = PlayerId(p as u8);
        let owned = state.owned_territories(player);
        let spare = starting.saturating_sub(owned.len() as u32);
        for _ in 0..spare {
            if let Some(&t) = owned.choose(rng) {
                state.territory_mut(t).armies += 1;
            }
        }
        let armies = state.armies_of(player);
        state.record(GameEvent::StartingArmiesPlaced { player, armies });
    }

    info!(
        players = count,
        territories = state.map.territory_count(),
        cards = total_cards,
        starting_armies = starting,
        "game created"
    );
    Ok(state)
}
