// ═══════════════════════════════════════════════════════════════════════
// Card system — deck, set validation, trade-in scoring
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{ConfigError, RuleViolation};
use crate::map::MapGraph;
use crate::rules::TradeScoring;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

// ── Deck ───────────────────────────────────────────────────────────────

/// One card per territory, symbols cycling Infantry → Cavalry → Artillery
/// in territory order, followed by the wildcards.
pub fn build_deck(map: &MapGraph, wildcards: u32) -> Result<Vec<Card>, ConfigError> {
    let size = map.territory_count() + wildcards as usize;
    let card_id = |i: usize| {
        u16::try_from(i).map(CardId).map_err(|_| ConfigError::DeckTooLarge { cards: size })
    };

    let mut cards = Vec::with_capacity(size);
    for (i, t) in map.territory_ids().enumerate() {
        cards.push(Card { id: card_id(i)?, symbol: CardSymbol::BASIC[i % 3], territory: Some(t) });
    }
    for i in map.territory_count()..size {
        cards.push(Card { id: card_id(i)?, symbol: CardSymbol::Wildcard, territory: None });
    }
    Ok(cards)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Undealt cards; the top of the deck is the end of the Vec.
    pub draw_pile: Vec<Card>,
    /// Traded-in cards waiting to be reshuffled.
    pub discard: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Deck { draw_pile: cards, discard: Vec::new() }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.draw_pile.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw_pile.is_empty()
    }

    /// Refill an empty draw pile from the discard pile. Returns how many
    /// cards were reshuffled, if any.
    pub fn reshuffle_if_empty<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if !self.draw_pile.is_empty() || self.discard.is_empty() {
            return None;
        }
        self.draw_pile.append(&mut self.discard);
        self.draw_pile.shuffle(rng);
        Some(self.draw_pile.len())
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.draw_pile.pop()
    }

    pub fn discard_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.discard.extend(cards);
    }
}

// ── Set patterns ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetPattern {
    Triple(CardSymbol),
    OneOfEach,
}

/// Every pattern the three symbols can complete, wildcards filling gaps.
/// Empty when the cards are not a set.
pub fn set_patterns(symbols: [CardSymbol; 3]) -> Vec<SetPattern> {
    let real: Vec<CardSymbol> = symbols.iter().copied().filter(|s| !s.is_wild()).collect();
    let mut patterns = Vec::new();
    for s in CardSymbol::BASIC {
        if real.iter().all(|&r| r == s) {
            patterns.push(SetPattern::Triple(s));
        }
    }
    let distinct = real.iter().enumerate().all(|(i, r)| !real[..i].contains(r));
    if distinct {
        patterns.push(SetPattern::OneOfEach);
    }
    patterns
}

pub fn is_valid_set(symbols: [CardSymbol; 3]) -> bool {
    !set_patterns(symbols).is_empty()
}

/// Value of the `tier`-th trade (0-based) in an escalating table.
pub fn tier_value(values: &[u32], increment: u32, tier: u32) -> u32 {
    let tier = tier as usize;
    match values.get(tier) {
        Some(&v) => v,
        None => {
            let last = values.last().copied().unwrap_or(0);
            let beyond = (tier + 1 - values.len()) as u32;
            last + increment * beyond
        }
    }
}

pub fn pattern_value(pattern: SetPattern, scoring: &TradeScoring, tier: u32) -> u32 {
    match scoring {
        TradeScoring::Escalating { values, increment } => tier_value(values, *increment, tier),
        TradeScoring::BySet { infantry, cavalry, artillery, mixed } => match pattern {
            SetPattern::Triple(CardSymbol::Infantry) => *infantry,
            SetPattern::Triple(CardSymbol::Cavalry) => *cavalry,
            SetPattern::Triple(CardSymbol::Artillery) => *artillery,
            SetPattern::Triple(CardSymbol::Wildcard) | SetPattern::OneOfEach => *mixed,
        },
    }
}

/// Best completion of the symbols under the scoring scheme.
pub fn set_value(symbols: [CardSymbol; 3], scoring: &TradeScoring, tier: u32) -> Option<(SetPattern, u32)> {
    set_patterns(symbols).into_iter()
        .map(|p| (p, pattern_value(p, scoring, tier)))
        .max_by_key(|&(_, v)| v)
}

// ── Trade-in ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIn {
    pub cards: [Card; 3],
    pub pattern: SetPattern,
    pub value: u32,
}

/// Check a chosen set against a hand and score it. Pure: nothing moves.
pub fn evaluate_tradein(
    hand: &[Card],
    chosen: [CardId; 3],
    scoring: &TradeScoring,
    tier: u32,
) -> Result<TradeIn, RuleViolation> {
    for (i, id) in chosen.iter().enumerate() {
        if chosen[..i].contains(id) {
            return Err(RuleViolation::DuplicateCard(*id));
        }
    }
    let mut cards = [Card { id: CardId(0), symbol: CardSymbol::Wildcard, territory: None }; 3];
    for (slot, id) in cards.iter_mut().zip(chosen) {
        *slot = *hand.iter()
            .find(|c| c.id == id)
            .ok_or(RuleViolation::CardNotInHand(id))?;
    }
    let symbols = cards.map(|c| c.symbol);
    let (pattern, value) = set_value(symbols, scoring, tier).ok_or(RuleViolation::InvalidSet)?;
    Ok(TradeIn { cards, pattern, value })
}

/// Highest-scoring set in a hand. Ties keep the earliest combination.
pub fn best_set(hand: &[Card], scoring: &TradeScoring, tier: u32) -> Option<([CardId; 3], u32)> {
    let mut best: Option<([CardId; 3], u32)> = None;
    for i in 0..hand.len() {
        for j in i + 1..hand.len() {
            for k in j + 1..hand.len() {
                let symbols = [hand[i].symbol, hand[j].symbol, hand[k].symbol];
                if let Some((_, v)) = set_value(symbols, scoring, tier) {
                    if best.map_or(true, |(_, bv)| v > bv) {
                        best = Some(([hand[i].id, hand[j].id, hand[k].id], v));
                    }
                }
            }
        }
    }
    best
}

pub fn has_valid_set(hand: &[Card]) -> bool {
    // Scoring is irrelevant to validity.
    best_set(hand, &TradeScoring::default(), 0).is_some()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOutcome {
    pub cards: [Card; 3],
    pub pattern: SetPattern,
    pub value: u32,
    /// Tier this trade was scored at (0-based).
    pub tier: u32,
    /// Owned territory that received the card bonus, with the amount.
    pub territory_bonus: Option<(TerritoryId, u32)>,
}

/// Validate and perform a trade: the cards go to the discard pile, the
/// value to the player's pool, the tier advances, and the first card naming
/// an owned territory garrisons it with the card bonus.
pub fn execute_trade(
    state: &mut GameState,
    player: PlayerId,
    chosen: [CardId; 3],
) -> Result<TradeOutcome, RuleViolation> {
    let tier = state.trades_completed;
    let trade = evaluate_tradein(&state.player(player).hand, chosen, &state.rules.trade_scoring, tier)?;

    let bonus = state.rules.territory_card_bonus;
    let territory_bonus = trade.cards.iter()
        .filter_map(|c| c.territory)
        .find(|&t| state.get_territory(t).is_some_and(|s| s.owner == Some(player)))
        .filter(|_| bonus > 0)
        .map(|t| (t, bonus));

    let p = state.player_mut(player);
    p.hand.retain(|c| !chosen.contains(&c.id));
    p.pool += trade.value;
    state.deck.discard_cards(trade.cards);
    state.trades_completed += 1;
    state.turn_stats.trades += 1;
    if let Some((t, amount)) = territory_bonus {
        state.territory_mut(t).armies += amount;
    }

    Ok(TradeOutcome {
        cards: trade.cards,
        pattern: trade.pattern,
        value: trade.value,
        tier,
        territory_bonus,
    })
}
