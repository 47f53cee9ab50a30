// ═══════════════════════════════════════════════════════════════════════
// Game Engine — turn/phase state machine and action resolution
//
// Architecture:
//   The engine is a pure state machine. It never does I/O or calls agents.
//   Instead it sets `state.pending` to describe what decision is needed,
//   and the runner/tournament code reads that, asks the acting player's
//   agent, and feeds the answer back via `apply_action()`.
//
// Flow:
//   1. Runner calls `advance()` to push the game forward
//   2. Engine processes until it needs a player decision → sets pending
//   3. Runner reads pending, asks agent, calls `apply_action(state, action)`
//   4. Repeat until the runner's stop condition (rounds, decisions)
//
// Turn: Trade → Draft → Attack → Fortify → End → next player's Trade.
// An illegal action is rejected without mutation, logged, and then
// handled exactly like the matching pass.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards;
use crate::combat;
use crate::error::RuleViolation;
use crate::events::GameEvent;
use crate::navigation;
use crate::reinforcement;
use crate::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Actions that agents can submit to resolve pending decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Trade three cards, or None to decline
    Trade(Option<[CardId; 3]>),

    /// Place armies from the pool
    Draft { territory: TerritoryId, armies: u32 },

    /// Attack, or None to end the attack phase
    Attack(Option<AttackOrder>),

    /// Extra armies to move into a freshly conquered territory
    Occupy(u32),

    /// Fortify once, or None to skip
    Fortify(Option<FortifyOrder>),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Trade(_) => "trade",
            Action::Draft { .. } => "draft",
            Action::Attack(_) => "attack",
            Action::Occupy(_) => "occupy",
            Action::Fortify(_) => "fortify",
        }
    }
}

/// Advance the game state. Processes automatic transitions until a
/// player decision is needed (sets state.pending).
pub fn advance<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    // A pending decision must be answered first
    if state.pending.is_some() {
        return;
    }

    // Every pass either sets pending or moves to a later phase; End always
    // lands on the next player's Trade, whose Draft pool is never empty.
    loop {
        let player = state.current_player;
        match state.phase {
            Phase::Trade => {
                let hand = &state.player(player).hand;
                if cards::has_valid_set(hand) {
                    let forced = hand.len() >= state.rules.forced_trade_hand_size;
                    state.pending = Some(PendingDecision::Trade { player, forced });
                    return;
                }
                begin_draft(state, player);
            }

            Phase::Draft => {
                let remaining = state.player(player).pool;
                if remaining > 0 {
                    state.pending = Some(PendingDecision::Draft { player, remaining });
                    return;
                }
                state.phase = Phase::Attack;
            }

            Phase::Attack => {
                if state.turn_stats.attacks >= state.rules.max_attacks_per_turn {
                    let attacks = state.turn_stats.attacks;
                    state.record(GameEvent::AttackLimitReached { attacks });
                    state.phase = Phase::Fortify;
                    continue;
                }
                if !navigation::has_legal_attack(&state.map, &state.territories, player) {
                    state.record(GameEvent::NoLegalAttacks);
                    state.phase = Phase::Fortify;
                    continue;
                }
                state.pending = Some(PendingDecision::Attack { player });
                return;
            }

            Phase::Fortify => {
                if navigation::has_fortify_move(&state.map, &state.territories, player) {
                    state.pending = Some(PendingDecision::Fortify { player });
                    return;
                }
                state.phase = Phase::End;
            }

            Phase::End => {
                end_turn(state, rng);
                if state.player(state.current_player).eliminated {
                    // Nobody left to act
                    return;
                }
            }
        }
    }
}

/// Apply an agent's action to resolve the current pending decision.
///
/// A rule violation leaves the state as it was, records an
/// `ActionRejected` event, applies the pass for that decision and is then
/// returned. Call `advance()` afterwards to reach the next decision.
pub fn apply_action<R: Rng + ?Sized>(state: &mut GameState, action: Action, rng: &mut R) -> Result<(), RuleViolation> {
    let Some(pending) = state.pending.take() else {
        return Err(RuleViolation::NoPendingDecision);
    };

    let result = match (pending.clone(), action) {
        (PendingDecision::Trade { player, forced }, Action::Trade(choice)) => {
            resolve_trade(state, player, forced, choice)
        }

        (PendingDecision::Draft { player, .. }, Action::Draft { territory, armies }) => {
            resolve_draft(state, player, territory, armies)
        }

        (PendingDecision::Attack { player }, Action::Attack(order)) => {
            resolve_attack(state, player, order, rng)
        }

        (PendingDecision::Occupy { player, from, to, max }, Action::Occupy(extra)) => {
            resolve_occupy(state, player, from, to, max, extra)
        }

        (PendingDecision::Fortify { player }, Action::Fortify(order)) => {
            resolve_fortify(state, player, order)
        }

        (pending, action) => Err(RuleViolation::UnexpectedAction {
            expected: pending.kind(),
            got: action.kind(),
        }),
    };

    if let Err(violation) = &result {
        reject(state, &pending, violation);
        decline(state, &pending);
    }
    result
}

// ── Phase resolution ───────────────────────────────────────────────────

fn resolve_trade(
    state: &mut GameState,
    player: PlayerId,
    forced: bool,
    choice: Option<[CardId; 3]>,
) -> Result<(), RuleViolation> {
    let Some(ids) = choice else {
        state.record(GameEvent::PhasePassed);
        decline(state, &PendingDecision::Trade { player, forced });
        return Ok(());
    };
    let outcome = cards::execute_trade(state, player, ids)?;
    state.record(GameEvent::CardsTraded {
        cards: ids,
        pattern: outcome.pattern,
        value: outcome.value,
        tier: outcome.tier,
        territory_bonus: outcome.territory_bonus,
        forced,
    });
    Ok(())
}

fn resolve_draft(
    state: &mut GameState,
    player: PlayerId,
    territory: TerritoryId,
    armies: u32,
) -> Result<(), RuleViolation> {
    let target = state.get_territory(territory).ok_or(RuleViolation::UnknownTerritory(territory))?;
    if target.owner != Some(player) {
        return Err(RuleViolation::NotOwned { territory, player });
    }
    if armies == 0 {
        return Err(RuleViolation::ZeroArmies);
    }
    let available = state.player(player).pool;
    if armies > available {
        return Err(RuleViolation::ExceedsPool { requested: armies, available });
    }

    state.territory_mut(territory).armies += armies;
    state.player_mut(player).pool -= armies;
    state.turn_stats.armies_drafted += armies;
    state.turn_stats.draft_rejections = 0;
    let remaining = state.player(player).pool;
    state.record(GameEvent::ArmiesDrafted { territory, armies, remaining });
    Ok(())
}

fn resolve_attack<R: Rng + ?Sized>(
    state: &mut GameState,
    player: PlayerId,
    order: Option<AttackOrder>,
    rng: &mut R,
) -> Result<(), RuleViolation> {
    let Some(order) = order else {
        state.record(GameEvent::PhasePassed);
        state.phase = Phase::Fortify;
        return Ok(());
    };
    combat::validate_attack(state, player, &order)?;
    state.turn_stats.attacks += 1;
    let result = combat::resolve_attack(state, order.from, order.to, order.armies, rng)?;

    state.record(GameEvent::AttackResolved {
        from: result.from,
        to: result.to,
        defender: result.defender,
        attacker_dice: result.attacker_dice.clone(),
        defender_dice: result.defender_dice.clone(),
        attacker_losses: result.attacker_losses,
        defender_losses: result.defender_losses,
        conquered: result.conquered,
        moved_in: result.moved_in,
    });

    if result.conquered {
        state.turn_stats.conquests += 1;
        if state.territory_count(result.defender) == 0 {
            eliminate(state, result.defender, player);
        }
        let spare = state.territory(order.from).armies.saturating_sub(1);
        if spare > 0 {
            state.pending = Some(PendingDecision::Occupy {
                player,
                from: order.from,
                to: order.to,
                max: spare,
            });
        }
    }
    Ok(())
}

fn resolve_occupy(
    state: &mut GameState,
    player: PlayerId,
    from: TerritoryId,
    to: TerritoryId,
    max: u32,
    extra: u32,
) -> Result<(), RuleViolation> {
    if extra > max {
        return Err(RuleViolation::OccupationExceeded { requested: extra, max });
    }
    if extra == 0 {
        return Ok(());
    }
    for t in [from, to] {
        if state.territory(t).owner != Some(player) {
            return Err(RuleViolation::NotOwned { territory: t, player });
        }
    }
    state.territory_mut(from).armies -= extra;
    state.territory_mut(to).armies += extra;
    state.record(GameEvent::TerritoryOccupied { from, to, armies: extra });
    Ok(())
}

fn resolve_fortify(
    state: &mut GameState,
    player: PlayerId,
    order: Option<FortifyOrder>,
) -> Result<(), RuleViolation> {
    let Some(order) = order else {
        state.record(GameEvent::PhasePassed);
        state.phase = Phase::End;
        return Ok(());
    };
    navigation::validate_fortify(state, player, &order)?;
    state.territory_mut(order.from).armies -= order.armies;
    state.territory_mut(order.to).armies += order.armies;
    state.record(GameEvent::Fortified { from: order.from, to: order.to, armies: order.armies });
    state.phase = Phase::End;
    Ok(())
}

// ── Passes and fallbacks ───────────────────────────────────────────────

fn reject(state: &mut GameState, pending: &PendingDecision, violation: &RuleViolation) {
    warn!(
        turn = state.turn,
        player = %pending.player(),
        decision = pending.kind(),
        %violation,
        "decision rejected"
    );
    state.record(GameEvent::ActionRejected {
        decision: pending.kind().to_string(),
        reason: violation.to_string(),
    });
}

/// The state transition for "no" on a pending decision.
fn decline(state: &mut GameState, pending: &PendingDecision) {
    match *pending {
        PendingDecision::Trade { player, forced } => {
            if forced {
                force_trade(state, player);
            } else {
                begin_draft(state, player);
            }
        }
        PendingDecision::Draft { player, .. } => {
            state.turn_stats.draft_rejections += 1;
            if state.turn_stats.draft_rejections >= state.rules.max_draft_rejections {
                auto_draft(state, player);
            }
        }
        PendingDecision::Attack { .. } => {
            state.phase = Phase::Fortify;
        }
        // Occupying with nothing extra is always legal.
        PendingDecision::Occupy { .. } => {}
        PendingDecision::Fortify { .. } => {
            state.phase = Phase::End;
        }
    }
}

/// The engine trades the best set on behalf of a player holding a full hand.
fn force_trade(state: &mut GameState, player: PlayerId) {
    let best = cards::best_set(&state.player(player).hand, &state.rules.trade_scoring, state.trades_completed);
    let Some((ids, _)) = best else {
        begin_draft(state, player);
        return;
    };
    match cards::execute_trade(state, player, ids) {
        Ok(outcome) => state.record(GameEvent::CardsTraded {
            cards: ids,
            pattern: outcome.pattern,
            value: outcome.value,
            tier: outcome.tier,
            territory_bonus: outcome.territory_bonus,
            forced: true,
        }),
        Err(_) => begin_draft(state, player),
    }
}

/// Put the whole remaining pool on the player's strongest territory.
fn auto_draft(state: &mut GameState, player: PlayerId) {
    let armies = state.player(player).pool;
    let strongest = state.owned_territories(player).into_iter()
        .max_by_key(|&t| (state.territory(t).armies, std::cmp::Reverse(t)));
    let Some(territory) = strongest else {
        return;
    };
    state.territory_mut(territory).armies += armies;
    state.player_mut(player).pool = 0;
    state.turn_stats.armies_drafted += armies;
    state.turn_stats.draft_rejections = 0;
    state.record(GameEvent::AutoDrafted { territory, armies });
}

// ── Transitions ────────────────────────────────────────────────────────

fn begin_draft(state: &mut GameState, player: PlayerId) {
    let allotment = reinforcement::compute_allotment(state, player);
    state.phase = Phase::Draft;
    let p = state.player_mut(player);
    p.pool += allotment.total();
    let pool = p.pool;
    state.record(GameEvent::ReinforcementsComputed {
        territories: allotment.territories,
        base: allotment.base,
        continent_bonus: allotment.continent_bonus,
        pool,
    });
}

fn eliminate(state: &mut GameState, loser: PlayerId, winner: PlayerId) {
    let taken = std::mem::take(&mut state.player_mut(loser).hand);
    let cards_taken = taken.len();
    let l = state.player_mut(loser);
    l.eliminated = true;
    l.pool = 0;
    state.player_mut(winner).hand.extend(taken);
    state.record(GameEvent::PlayerEliminated { player: loser, cards_taken });
    info!(turn = state.turn, player = %loser, by = %winner, cards_taken, "player eliminated");
}

fn end_turn<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let player = state.current_player;

    if state.turn_stats.conquests > 0 {
        if let Some(cards) = state.deck.reshuffle_if_empty(rng) {
            state.record(GameEvent::DeckReshuffled { cards });
        }
        match state.deck.draw() {
            Some(card) => {
                state.player_mut(player).hand.push(card);
                state.record(GameEvent::CardDrawn { card: card.id });
            }
            None => state.record(GameEvent::CardGrantSkipped),
        }
    }

    let territories = state.territory_count(player);
    let armies = state.armies_of(player);
    let cards = state.player(player).hand.len();
    let conquests = state.turn_stats.conquests;
    state.record(GameEvent::TurnEnded { territories, armies, cards, conquests });
    info!(
        turn = state.turn,
        round = state.round,
        player = %player,
        territories,
        armies,
        cards,
        conquests,
        attacks = state.turn_stats.attacks,
        "turn ended"
    );

    // Rotate, skipping eliminated players
    let n = state.players.len();
    let mut idx = player.0 as usize;
    for _ in 0..n {
        idx = (idx + 1) % n;
        if idx == 0 {
            state.round += 1;
        }
        if !state.players[idx].eliminated {
            break;
        }
    }
    state.current_player = PlayerId(idx as u8);
    state.turn += 1;
    state.phase = Phase::Trade;
    state.turn_stats = TurnStats::default();
}
