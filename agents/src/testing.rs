//! Board fixtures shared by the agent tests.

use risk_engine::map::{MapDefinition, MapGraph};
use risk_engine::setup::create_state_with_assignment;
use risk_engine::types::*;
use risk_engine::visibility::{player_view, PlayerView};
use risk_engine::RulesConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Six territories A-F in a line (ids 0..6), one continent.
pub fn line_map() -> Arc<MapGraph> {
    let mut def = MapDefinition::default();
    def.add_continent("Isle", 2, &["A", "B", "C", "D", "E", "F"])
        .add_border("A", "B")
        .add_border("B", "C")
        .add_border("C", "D")
        .add_border("D", "E")
        .add_border("E", "F");
    Arc::new(MapGraph::from_definition(&def).unwrap())
}

/// View for `viewer` of a line board with the given owners and armies.
pub fn line_view(owners: &[u8], armies: &[u32], viewer: u8) -> PlayerView {
    let names = vec!["p0".to_string(), "p1".to_string()];
    let owners: Vec<PlayerId> = owners.iter().map(|&o| PlayerId(o)).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut state = create_state_with_assignment(line_map(), &names, &owners, RulesConfig::default(), &mut rng).unwrap();
    for (i, &a) in armies.iter().enumerate() {
        state.territories[i].armies = a;
    }
    player_view(&state, PlayerId(viewer))
}

pub fn with_cards(mut view: PlayerView, symbols: &[CardSymbol]) -> PlayerView {
    view.my_hand = symbols.iter().enumerate()
        .map(|(i, &symbol)| Card { id: CardId(100 + i as u16), symbol, territory: None })
        .collect();
    view
}
