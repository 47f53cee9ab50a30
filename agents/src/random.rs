// ═══════════════════════════════════════════════════════════════════════
// Random Agent — makes all decisions randomly.
// Serves as baseline and for testing game engine stability. Some of its
// choices (a random card triple) are illegal on purpose.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use risk_engine::types::*;
use risk_engine::visibility::PlayerView;

pub struct RandomAgent {
    player: PlayerId,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(player: PlayerId, seed: u64) -> Self {
        RandomAgent {
            player,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str { "Random" }
    fn player(&self) -> PlayerId { self.player }

    fn decide_trade(&mut self, view: &PlayerView, forced: bool) -> Option<[CardId; 3]> {
        if view.my_hand.len() >= 3 && self.rng.gen_bool(0.2) {
            // Any three cards, valid or not
            let picked: Vec<CardId> = view.my_hand
                .choose_multiple(&mut self.rng, 3)
                .map(|c| c.id)
                .collect();
            return Some([picked[0], picked[1], picked[2]]);
        }
        if forced || self.rng.gen_bool(0.5) {
            view.best_set().map(|(cards, _)| cards)
        } else {
            None
        }
    }

    fn decide_draft(&mut self, view: &PlayerView, remaining: u32) -> (TerritoryId, u32) {
        let owned = view.owned();
        let target = owned.choose(&mut self.rng).copied().unwrap_or(TerritoryId(0));
        (target, self.rng.gen_range(1..=remaining.max(1)))
    }

    fn decide_attack(&mut self, view: &PlayerView) -> Option<AttackOrder> {
        if self.rng.gen_bool(0.25) {
            return None;
        }
        let sources = view.attack_sources();
        let &from = sources.choose(&mut self.rng)?;
        let targets = view.attack_targets(from);
        let &to = targets.choose(&mut self.rng)?;
        let armies = self.rng.gen_range(1..view.armies(from));
        Some(AttackOrder { from, to, armies })
    }

    fn decide_occupy(&mut self, _view: &PlayerView, _from: TerritoryId, _to: TerritoryId, max: u32) -> u32 {
        self.rng.gen_range(0..=max)
    }

    fn decide_fortify(&mut self, view: &PlayerView) -> Option<FortifyOrder> {
        if self.rng.gen_bool(0.5) {
            return None;
        }
        let stacks: Vec<TerritoryId> = view.owned().into_iter()
            .filter(|&t| view.armies(t) > 1)
            .collect();
        let &from = stacks.choose(&mut self.rng)?;
        let destinations: Vec<TerritoryId> = view.reachable(from).into_iter()
            .filter(|&t| t != from)
            .collect();
        let &to = destinations.choose(&mut self.rng)?;
        let armies = self.rng.gen_range(1..view.armies(from));
        Some(FortifyOrder { from, to, armies })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::line_view;

    #[test]
    fn random_orders_stay_on_the_board() {
        let view = line_view(&[0, 0, 0, 1, 1, 1], &[4, 1, 5, 2, 1, 1], 0);
        let mut agent = RandomAgent::new(PlayerId(0), 11);
        for _ in 0..100 {
            if let Some(order) = agent.decide_attack(&view) {
                assert_eq!(order.from, TerritoryId(2));
                assert_eq!(order.to, TerritoryId(3));
                assert!((1..5).contains(&order.armies));
            }
            if let Some(order) = agent.decide_fortify(&view) {
                assert_eq!(view.owner(order.to), Some(PlayerId(0)));
                assert!(order.armies < view.armies(order.from));
            }
            let (t, armies) = agent.decide_draft(&view, 3);
            assert_eq!(view.owner(t), Some(PlayerId(0)));
            assert!((1..=3).contains(&armies));
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let view = line_view(&[0, 0, 0, 1, 1, 1], &[4, 1, 5, 2, 1, 1], 0);
        let mut a = RandomAgent::new(PlayerId(0), 99);
        let mut b = RandomAgent::new(PlayerId(0), 99);
        for _ in 0..20 {
            assert_eq!(a.decide_attack(&view), b.decide_attack(&view));
            assert_eq!(a.decide_fortify(&view), b.decide_fortify(&view));
        }
    }
}
