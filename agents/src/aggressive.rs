// ═══════════════════════════════════════════════════════════════════════
// Aggressive Agent — trades every set it can, stacks its front line and
// attacks whenever it outnumbers the defender by a margin.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use risk_engine::types::*;
use risk_engine::visibility::PlayerView;

pub const DEFAULT_MARGIN: u32 = 2;

pub struct AggressiveAgent {
    player: PlayerId,
    /// Committed armies must be at least defenders + margin.
    margin: u32,
}

impl AggressiveAgent {
    pub fn new(player: PlayerId) -> Self {
        Self::with_margin(player, DEFAULT_MARGIN)
    }

    pub fn with_margin(player: PlayerId, margin: u32) -> Self {
        AggressiveAgent { player, margin }
    }

    /// Strongest of `candidates`; ties go to the lowest id.
    fn strongest(view: &PlayerView, candidates: impl IntoIterator<Item = TerritoryId>) -> Option<TerritoryId> {
        candidates.into_iter()
            .max_by(|a, b| view.armies(*a).cmp(&view.armies(*b)).then(b.cmp(a)))
    }
}

impl Agent for AggressiveAgent {
    fn name(&self) -> &str { "Aggressive" }
    fn player(&self) -> PlayerId { self.player }

    fn decide_trade(&mut self, view: &PlayerView, _forced: bool) -> Option<[CardId; 3]> {
        view.best_set().map(|(cards, _)| cards)
    }

    fn decide_draft(&mut self, view: &PlayerView, remaining: u32) -> (TerritoryId, u32) {
        let owned = view.owned();
        let front = owned.iter().copied().filter(|&t| view.is_border(t));
        let target = Self::strongest(view, front)
            .or_else(|| Self::strongest(view, owned.iter().copied()))
            .unwrap_or(TerritoryId(0));
        (target, remaining)
    }

    fn decide_attack(&mut self, view: &PlayerView) -> Option<AttackOrder> {
        let mut best: Option<(u32, AttackOrder)> = None;

        for from in view.attack_sources() {
            let committed = view.armies(from) - 1;
            for to in view.attack_targets(from) {
                let defenders = view.armies(to);
                if committed < defenders + self.margin {
                    continue;
                }
                let edge = committed - defenders;
                if best.as_ref().map_or(true, |(e, _)| edge > *e) {
                    best = Some((edge, AttackOrder { from, to, armies: committed }));
                }
            }
        }
        best.map(|(_, order)| order)
    }

    fn decide_occupy(&mut self, _view: &PlayerView, _from: TerritoryId, _to: TerritoryId, max: u32) -> u32 {
        max
    }

    fn decide_fortify(&mut self, view: &PlayerView) -> Option<FortifyOrder> {
        let interior = view.owned().into_iter()
            .filter(|&t| !view.is_border(t) && view.armies(t) > 1);
        let from = Self::strongest(view, interior)?;

        let front = view.reachable(from).into_iter().filter(|&t| view.is_border(t));
        let to = Self::strongest(view, front)?;
        Some(FortifyOrder { from, to, armies: view.armies(from) - 1 })
    }
}
