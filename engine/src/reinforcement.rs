// ═══════════════════════════════════════════════════════════════════════
// Reinforcement — draft allotment from territories and continents
// ═══════════════════════════════════════════════════════════════════════

use crate::map::MapGraph;
use crate::rules::RulesConfig;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allotment {
    pub territories: u32,
    pub base: u32,
    pub continent_bonus: u32,
}

impl Allotment {
    pub fn total(&self) -> u32 {
        self.base + self.continent_bonus
    }
}

/// Territories ÷ divisor, floored, never below the minimum.
pub fn base_allotment(territories: u32, rules: &RulesConfig) -> u32 {
    (territories / rules.draft_divisor.max(1)).max(rules.draft_minimum)
}

/// Continents whose every territory is owned by `player`.
pub fn owned_continents(map: &MapGraph, territories: &[TerritoryState], player: PlayerId) -> Vec<ContinentId> {
    map.continents().iter()
        .filter(|c| !c.territories.is_empty())
        .filter(|c| c.territories.iter().all(|t| territories[t.0 as usize].owner == Some(player)))
        .map(|c| c.id)
        .collect()
}

pub fn continent_bonus(map: &MapGraph, territories: &[TerritoryState], player: PlayerId) -> u32 {
    owned_continents(map, territories, player).iter()
        .map(|&c| map.continent(c).bonus)
        .sum()
}

pub fn compute_allotment(state: &GameState, player: PlayerId) -> Allotment {
    let owned = state.territory_count(player) as u32;
    Allotment {
        territories: owned,
        base: base_allotment(owned, &state.rules),
        continent_bonus: continent_bonus(&state.map, &state.territories, player),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapDefinition, MapGraph};

    #[test]
    fn minimum_clamp_and_division() {
        let rules = RulesConfig::default();
        assert_eq!(base_allotment(11, &rules), 3);
        assert_eq!(base_allotment(15, &rules), 5);
        assert_eq!(base_allotment(0, &rules), 3);
        assert_eq!(base_allotment(42, &rules), 14);
    }

    #[test]
    fn custom_divisor() {
        let rules = RulesConfig { draft_divisor: 2, draft_minimum: 1, ..RulesConfig::default() };
        assert_eq!(base_allotment(1, &rules), 1);
        assert_eq!(base_allotment(7, &rules), 3);
    }

    #[test]
    fn bonus_only_for_complete_continents() {
        let mut def = MapDefinition::default();
        def.add_continent("East", 4, &["A", "B"])
            .add_continent("West", 1, &["C"])
            .add_border("A", "B")
            .add_border("B", "C");
        let map = MapGraph::from_definition(&def).unwrap();
        let p = PlayerId(0);
        let q = PlayerId(1);
        let owned = |o: [PlayerId; 3]| -> Vec<TerritoryState> {
            o.iter().map(|&p| TerritoryState { owner: Some(p), armies: 1 }).collect()
        };

        let board = owned([p, p, q]);
        assert_eq!(owned_continents(&map, &board, p), vec![ContinentId(0)]);
        assert_eq!(continent_bonus(&map, &board, p), 4);
        assert_eq!(continent_bonus(&map, &board, q), 1);

        let board = owned([p, q, q]);
        assert_eq!(continent_bonus(&map, &board, p), 0);
        assert_eq!(continent_bonus(&map, &board, q), 1);
    }
}
