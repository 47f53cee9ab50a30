// ═══════════════════════════════════════════════════════════════════════
// Navigation — attack targets and fortify connectivity
// ═══════════════════════════════════════════════════════════════════════

use crate::error::RuleViolation;
use crate::map::MapGraph;
use crate::types::*;
use std::collections::VecDeque;

/// Every territory reachable from `from` through a chain of territories
/// owned by `player`, including `from` itself.
pub fn reachable(map: &MapGraph, territories: &[TerritoryState], from: TerritoryId, player: PlayerId) -> Vec<TerritoryId> {
    let owned = |t: TerritoryId| territories.get(t.0 as usize).is_some_and(|s| s.owner == Some(player));
    if !owned(from) {
        return Vec::new();
    }

    let mut queue: VecDeque<TerritoryId> = VecDeque::new();
    let mut visited = vec![false; territories.len()];
    let mut found = Vec::new();

    queue.push_back(from);
    visited[from.0 as usize] = true;

    while let Some(current) = queue.pop_front() {
        found.push(current);
        for &adj in map.neighbors(current) {
            if visited[adj.0 as usize] || !owned(adj) {
                continue;
            }
            visited[adj.0 as usize] = true;
            queue.push_back(adj);
        }
    }
    found
}

/// Path check through owned territory only; adjacency alone is not enough
/// when an enemy sits in between.
pub fn is_connected(map: &MapGraph, territories: &[TerritoryState], from: TerritoryId, to: TerritoryId, player: PlayerId) -> bool {
    reachable(map, territories, from, player).contains(&to)
}

/// Enemy-held neighbors of `from`.
pub fn attack_targets(map: &MapGraph, territories: &[TerritoryState], from: TerritoryId) -> Vec<TerritoryId> {
    let Some(owner) = territories.get(from.0 as usize).and_then(|s| s.owner) else {
        return Vec::new();
    };
    map.neighbors(from).iter()
        .copied()
        .filter(|t| territories[t.0 as usize].owner.is_some_and(|o| o != owner))
        .collect()
}

pub fn is_border(map: &MapGraph, territories: &[TerritoryState], territory: TerritoryId) -> bool {
    !attack_targets(map, territories, territory).is_empty()
}

/// Owned territories with more than one army and an enemy neighbor.
pub fn attack_sources(map: &MapGraph, territories: &[TerritoryState], player: PlayerId) -> Vec<TerritoryId> {
    map.territory_ids()
        .filter(|t| {
            let s = &territories[t.0 as usize];
            s.owner == Some(player) && s.armies > 1
        })
        .filter(|&t| is_border(map, territories, t))
        .collect()
}

pub fn has_legal_attack(map: &MapGraph, territories: &[TerritoryState], player: PlayerId) -> bool {
    !attack_sources(map, territories, player).is_empty()
}

/// A fortify move exists when some owned territory with spare armies
/// touches another owned territory.
pub fn has_fortify_move(map: &MapGraph, territories: &[TerritoryState], player: PlayerId) -> bool {
    map.territory_ids().any(|t| {
        let s = &territories[t.0 as usize];
        s.owner == Some(player)
            && s.armies > 1
            && map.neighbors(t).iter().any(|n| territories[n.0 as usize].owner == Some(player))
    })
}

pub fn validate_fortify(state: &GameState, player: PlayerId, order: &FortifyOrder) -> Result<(), RuleViolation> {
    let src = state.get_territory(order.from).ok_or(RuleViolation::UnknownTerritory(order.from))?;
    let dst = state.get_territory(order.to).ok_or(RuleViolation::UnknownTerritory(order.to))?;
    if src.owner != Some(player) {
        return Err(RuleViolation::NotOwned { territory: order.from, player });
    }
    if dst.owner != Some(player) {
        return Err(RuleViolation::NotOwned { territory: order.to, player });
    }
    if order.from == order.to {
        return Err(RuleViolation::SameTerritory);
    }
    if order.armies == 0 {
        return Err(RuleViolation::ZeroArmies);
    }
    if order.armies >= src.armies {
        return Err(RuleViolation::WouldEmptySource { from: order.from, armies: order.armies });
    }
    if !is_connected(&state.map, &state.territories, order.from, order.to, player) {
        return Err(RuleViolation::NoOwnedPath { from: order.from, to: order.to });
    }
    Ok(())
}
