//! Game invariants - sanity checks that detect engine bugs.
//!
//! Every state reachable through `advance`/`apply_action` must pass these.
//! They are run after every step by the randomized test suites.

use crate::types::*;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("invariant violation: {message}")]
pub struct InvariantViolation {
    pub message: String,
}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all game invariants.
///
/// Returns every violation found, or an empty list if all hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Board shape
    if state.territories.len() != state.map.territory_count() {
        violations.push(violation(format!(
            "{} territory states for a map of {}",
            state.territories.len(), state.map.territory_count()
        )));
    }

    // Garrisons
    for (i, t) in state.territories.iter().enumerate() {
        match t.owner {
            Some(_) if t.armies == 0 => violations.push(violation(format!(
                "owned territory {} ({}) has no army", i, state.map.name(TerritoryId(i as u16))
            ))),
            None if t.armies > 0 => violations.push(violation(format!(
                "unowned territory {} holds {} armies", i, t.armies
            ))),
            _ => {}
        }
    }

    // Card conservation
    let in_play = state.cards_in_play();
    if in_play != state.total_cards {
        violations.push(violation(format!(
            "card count {} differs from the {} dealt at setup", in_play, state.total_cards
        )));
    }

    // Each card in exactly one place
    let mut seen = HashSet::new();
    let all_cards = state.deck.draw_pile.iter()
        .chain(state.deck.discard.iter())
        .chain(state.players.iter().flat_map(|p| p.hand.iter()));
    for card in all_cards {
        if !seen.insert(card.id) {
            violations.push(violation(format!("card {:?} is in more than one place", card.id)));
        }
    }

    // Players
    for p in &state.players {
        let owned = state.territory_count(p.id);
        if p.eliminated {
            if owned > 0 {
                violations.push(violation(format!("eliminated player {} still owns {} territories", p.id, owned)));
            }
            if !p.hand.is_empty() {
                violations.push(violation(format!("eliminated player {} still holds {} cards", p.id, p.hand.len())));
            }
        } else if owned == 0 {
            violations.push(violation(format!("player {} owns nothing but is not eliminated", p.id)));
        }

        if p.id != state.current_player && p.pool > 0 {
            violations.push(violation(format!("player {} holds an undrafted pool of {} off-turn", p.id, p.pool)));
        }
    }

    if state.player(state.current_player).eliminated {
        violations.push(violation(format!("current player {} is eliminated", state.current_player)));
    }

    // A full hand must have been traded down before drafting
    let hand = state.player(state.current_player).hand.len();
    if state.phase == Phase::Draft && hand >= state.rules.forced_trade_hand_size {
        violations.push(violation(format!(
            "player {} is drafting while holding {} cards", state.current_player, hand
        )));
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// # Panics
///
/// Panics with every violation listed.
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}
