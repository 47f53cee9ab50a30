// ═══════════════════════════════════════════════════════════════════════
// Passive Agent — the neutral seat. Trades only when the hand is full,
// drops one army at a time on a random territory, never attacks or moves.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use risk_engine::types::*;
use risk_engine::visibility::PlayerView;

pub struct PassiveAgent {
    player: PlayerId,
    rng: ChaCha8Rng,
}

impl PassiveAgent {
    pub fn new(player: PlayerId, seed: u64) -> Self {
        PassiveAgent {
            player,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for PassiveAgent {
    fn name(&self) -> &str { "Passive" }
    fn player(&self) -> PlayerId { self.player }

    fn decide_trade(&mut self, view: &PlayerView, forced: bool) -> Option<[CardId; 3]> {
        if !forced {
            return None;
        }
        view.best_set().map(|(cards, _)| cards)
    }

    fn decide_draft(&mut self, view: &PlayerView, _remaining: u32) -> (TerritoryId, u32) {
        let owned = view.owned();
        let target = owned.choose(&mut self.rng).copied().unwrap_or(TerritoryId(0));
        (target, 1)
    }

    fn decide_attack(&mut self, _view: &PlayerView) -> Option<AttackOrder> {
        None
    }

    fn decide_fortify(&mut self, _view: &PlayerView) -> Option<FortifyOrder> {
        None
    }
}
