// ═══════════════════════════════════════════════════════════════════════
// Combat — dice resolution of a single attack, full battles, odds
// ═══════════════════════════════════════════════════════════════════════

use crate::error::RuleViolation;
use crate::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const MAX_ATTACK_DICE: u32 = 3;
pub const MAX_DEFENSE_DICE: u32 = 2;

// ── Dice ───────────────────────────────────────────────────────────────

/// Source of six-sided die faces. Every `Rng` is one; tests can script
/// the faces with `ScriptedDice`.
pub trait DieRoller {
    fn roll_die(&mut self) -> u8;
}

impl<R: Rng + ?Sized> DieRoller for R {
    fn roll_die(&mut self) -> u8 {
        self.gen_range(1..=6)
    }
}

/// Replays a fixed sequence of faces, then keeps rolling 1s.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new(faces: &[u8]) -> Self {
        ScriptedDice { faces: faces.iter().copied().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DieRoller for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        self.faces.pop_front().unwrap_or(1)
    }
}

/// Roll `count` dice, sorted highest first.
pub fn roll_dice<D: DieRoller + ?Sized>(dice: &mut D, count: u32) -> Vec<u8> {
    let mut rolled: Vec<u8> = (0..count).map(|_| dice.roll_die()).collect();
    rolled.sort_unstable_by(|a, b| b.cmp(a));
    rolled
}

/// Compare highest against highest, and so on. Each pair costs the lower
/// side one army; a tie costs the attacker. Returns
/// `(attacker_losses, defender_losses)`.
pub fn compare_dice(attacker: &[u8], defender: &[u8]) -> (u32, u32) {
    let mut att = attacker.to_vec();
    let mut def = defender.to_vec();
    att.sort_unstable_by(|a, b| b.cmp(a));
    def.sort_unstable_by(|a, b| b.cmp(a));

    let mut losses = (0, 0);
    for (a, d) in att.iter().zip(def.iter()) {
        if a > d {
            losses.1 += 1;
        } else {
            losses.0 += 1;
        }
    }
    losses
}

// ── Single attack ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub from: TerritoryId,
    pub to: TerritoryId,
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub attacker_dice: Vec<u8>,
    pub defender_dice: Vec<u8>,
    pub attacker_losses: u32,
    pub defender_losses: u32,
    pub conquered: bool,
    /// Armies that entered the conquered territory (0 unless conquered).
    pub moved_in: u32,
}

/// Legality of an attack by `player`, checked without touching the state.
pub fn validate_attack(state: &GameState, player: PlayerId, order: &AttackOrder) -> Result<(), RuleViolation> {
    let src = state.get_territory(order.from).ok_or(RuleViolation::UnknownTerritory(order.from))?;
    let dst = state.get_territory(order.to).ok_or(RuleViolation::UnknownTerritory(order.to))?;
    if src.owner != Some(player) {
        return Err(RuleViolation::NotOwned { territory: order.from, player });
    }
    if src.armies <= 1 {
        return Err(RuleViolation::SourceTooWeak(order.from));
    }
    if dst.owner.is_none() || dst.owner == Some(player) {
        return Err(RuleViolation::NotAnEnemy(order.to));
    }
    if !state.map.are_adjacent(order.from, order.to) {
        return Err(RuleViolation::NotAdjacent { from: order.from, to: order.to });
    }
    if order.armies < 1 || order.armies >= src.armies {
        return Err(RuleViolation::InvalidArmyCount { armies: order.armies, available: src.armies });
    }
    Ok(())
}

/// Resolve one round of dice between two territories. The source's owner
/// attacks with `armies` committed armies. On a conquest the surviving
/// committed armies move in (at least one). Nothing is mutated if the
/// attack is illegal.
pub fn resolve_attack<D: DieRoller + ?Sized>(
    state: &mut GameState,
    from: TerritoryId,
    to: TerritoryId,
    armies: u32,
    dice: &mut D,
) -> Result<CombatResult, RuleViolation> {
    let src = *state.get_territory(from).ok_or(RuleViolation::UnknownTerritory(from))?;
    let attacker = src.owner.ok_or(RuleViolation::NotAnEnemy(from))?;
    validate_attack(state, attacker, &AttackOrder { from, to, armies })?;
    let dst = *state.territory(to);
    let defender = dst.owner.ok_or(RuleViolation::NotAnEnemy(to))?;

    let attacker_dice = roll_dice(dice, armies.min(MAX_ATTACK_DICE));
    let defender_dice = roll_dice(dice, dst.armies.min(MAX_DEFENSE_DICE));
    let (attacker_losses, defender_losses) = compare_dice(&attacker_dice, &defender_dice);

    state.territory_mut(from).armies -= attacker_losses;
    state.territory_mut(to).armies -= defender_losses;

    let conquered = state.territory(to).armies == 0;
    let mut moved_in = 0;
    if conquered {
        moved_in = (armies - attacker_losses).max(1);
        state.territory_mut(from).armies -= moved_in;
        let t = state.territory_mut(to);
        t.owner = Some(attacker);
        t.armies = moved_in;
    }

    Ok(CombatResult {
        from,
        to,
        attacker,
        defender,
        attacker_dice,
        defender_dice,
        attacker_losses,
        defender_losses,
        conquered,
        moved_in,
    })
}

// ── Battles and odds ───────────────────────────────────────────────────

/// Fight dice rounds until the attackers are down to nothing or the
/// defenders are wiped out. Returns the survivors `(attackers, defenders)`.
pub fn battle<D: DieRoller + ?Sized>(mut attackers: u32, mut defenders: u32, dice: &mut D) -> (u32, u32) {
    while attackers > 0 && defenders > 0 {
        let a = roll_dice(dice, attackers.min(MAX_ATTACK_DICE));
        let d = roll_dice(dice, defenders.min(MAX_DEFENSE_DICE));
        let (al, dl) = compare_dice(&a, &d);
        attackers -= al;
        defenders -= dl;
    }
    (attackers, defenders)
}

/// Monte Carlo chance that `attackers` committed armies wipe out `defenders`.
pub fn estimate_win_probability<D: DieRoller + ?Sized>(
    attackers: u32,
    defenders: u32,
    trials: u32,
    dice: &mut D,
) -> f64 {
    if trials == 0 {
        return 0.0;
    }
    let wins = (0..trials)
        .filter(|_| battle(attackers, defenders, dice).1 == 0)
        .count();
    wins as f64 / trials as f64
}
