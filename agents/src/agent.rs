// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — the decision interface every strategy implements
//
// KEY DESIGN PRINCIPLE:
//   Agents receive a `PlayerView` (not raw GameState), which only
//   contains information the player is legally allowed to see.
//   This enforces information hiding at the type level.
//
//   The agent never gets to see:
//     - Opponents' cards
//     - Order of the draw pile
//
//   The engine treats every agent the same way. It never asks which
//   strategy is behind the trait object.
// ═══════════════════════════════════════════════════════════════════════

use risk_engine::types::*;
use risk_engine::engine::Action;
use risk_engine::visibility::PlayerView;
use std::fmt;
use std::str::FromStr;

/// Trait that all AI agents must implement.
/// Each method corresponds to a pending decision type.
pub trait Agent: Send + Sync {
    /// Human-readable name for this agent (e.g., "Aggressive", "Passive").
    fn name(&self) -> &str;

    /// The seat this agent is playing.
    fn player(&self) -> PlayerId;

    /// Make a decision based on the current player view.
    /// Returns None when the view carries no decision for this agent.
    fn decide(&mut self, view: &PlayerView) -> Option<Action> {
        let action = match view.pending.clone()? {
            PendingDecision::Trade { forced, .. } => {
                Action::Trade(self.decide_trade(view, forced))
            }
            PendingDecision::Draft { remaining, .. } => {
                let (territory, armies) = self.decide_draft(view, remaining);
                Action::Draft { territory, armies }
            }
            PendingDecision::Attack { .. } => {
                Action::Attack(self.decide_attack(view))
            }
            PendingDecision::Occupy { from, to, max, .. } => {
                Action::Occupy(self.decide_occupy(view, from, to, max))
            }
            PendingDecision::Fortify { .. } => {
                Action::Fortify(self.decide_fortify(view))
            }
        };
        Some(action)
    }

    // ── Individual decision methods ────────────────────────────────────

    /// Pick three cards to trade. None = decline (ignored when `forced`).
    fn decide_trade(&mut self, view: &PlayerView, forced: bool) -> Option<[CardId; 3]>;

    /// Place some of the `remaining` pool on an owned territory.
    fn decide_draft(&mut self, view: &PlayerView, remaining: u32) -> (TerritoryId, u32);

    /// Declare one attack. None = stop attacking this turn.
    fn decide_attack(&mut self, view: &PlayerView) -> Option<AttackOrder>;

    /// Extra armies to move into a conquered territory, at most `max`.
    fn decide_occupy(&mut self, _view: &PlayerView, _from: TerritoryId, _to: TerritoryId, _max: u32) -> u32 {
        0
    }

    /// The single end-of-turn movement. None = skip.
    fn decide_fortify(&mut self, view: &PlayerView) -> Option<FortifyOrder>;
}

// ── Strategy catalogue ─────────────────────────────────────────────────

/// The built-in strategies, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Aggressive,
    Passive,
    Random,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Aggressive, AgentKind::Passive, AgentKind::Random];

    /// Build a boxed agent of this kind for `player`.
    pub fn build(self, player: PlayerId, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::Aggressive => Box::new(crate::AggressiveAgent::new(player)),
            AgentKind::Passive => Box::new(crate::PassiveAgent::new(player, seed)),
            AgentKind::Random => Box::new(crate::RandomAgent::new(player, seed)),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            AgentKind::Aggressive => "aggressive",
            AgentKind::Passive => "passive",
            AgentKind::Random => "random",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aggressive" => Ok(AgentKind::Aggressive),
            "passive" | "neutral" => Ok(AgentKind::Passive),
            "random" => Ok(AgentKind::Random),
            other => Err(format!("unknown agent '{}' (expected aggressive, passive or random)", other)),
        }
    }
}
