// ═══════════════════════════════════════════════════════════════════════
// Game Runner — drives one headless game with agents
// ═══════════════════════════════════════════════════════════════════════

use risk_agents::Agent;
use risk_engine::engine::{self, Action};
use risk_engine::types::*;
use risk_engine::visibility::player_view;
use risk_engine::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Explicit stop conditions. The engine itself never ends a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLimits {
    /// Stop once this many full rounds have been played.
    pub max_rounds: u32,
    /// Safety limit on agent decisions.
    pub max_decisions: usize,
}

impl Default for RunLimits {
    fn default() -> Self {
        RunLimits { max_rounds: 100, max_decisions: 1_000_000 }
    }
}

impl RunLimits {
    pub fn rounds(max_rounds: u32) -> Self {
        RunLimits { max_rounds, ..Self::default() }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid game setup: {0}")]
    Config(#[from] ConfigError),

    #[error("no agent seated for {0}")]
    MissingAgent(PlayerId),

    #[error("agent for {player} gave no answer to a {decision} decision")]
    NoDecision { player: PlayerId, decision: &'static str },

    #[error("game exceeded {limit} decisions (round {round})")]
    DecisionLimit { limit: usize, round: u32 },

    #[error("game stuck: phase {phase}, round {round}")]
    Stuck { phase: Phase, round: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    RoundLimit,
    /// Every other player has been eliminated.
    LastPlayerStanding,
}

/// Where a player ended up when the run stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    pub player: PlayerId,
    pub name: String,
    pub agent: String,
    pub territories: usize,
    pub armies: u32,
    pub cards: usize,
    pub continents: usize,
    pub eliminated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub stop: StopReason,
    pub rounds_completed: u32,
    pub turns: u32,
    pub decisions: usize,
    pub rejections: usize,
    pub events: usize,
    /// In seat order.
    pub standings: Vec<Standing>,
}

impl GameSummary {
    /// Seat holding the most territories, then the most armies.
    pub fn leader(&self) -> Option<&Standing> {
        self.standings.iter()
            .filter(|s| !s.eliminated)
            .max_by(|a, b| {
                a.territories.cmp(&b.territories)
                    .then(a.armies.cmp(&b.armies))
                    .then(b.player.cmp(&a.player))
            })
    }
}

/// Play `state` until a stop condition, asking each seat's agent for its
/// decisions through a `PlayerView`.
pub fn run_game<R: Rng + ?Sized>(
    state: &mut GameState,
    agents: &mut [Box<dyn Agent>],
    rng: &mut R,
    limits: RunLimits,
) -> Result<GameSummary, RunError> {
    run_game_observed(state, agents, rng, limits, |_, _| {})
}

/// Like `run_game`, calling `on_step` after every applied decision.
pub fn run_game_observed<R, F>(
    state: &mut GameState,
    agents: &mut [Box<dyn Agent>],
    rng: &mut R,
    limits: RunLimits,
    mut on_step: F,
) -> Result<GameSummary, RunError>
where
    R: Rng + ?Sized,
    F: FnMut(&GameState, &Action),
{
    let mut decisions = 0usize;
    let mut rejections = 0usize;

    let stop = loop {
        // Advance engine until it needs a decision
        engine::advance(state, rng);

        if state.alive_players().len() <= 1 {
            break StopReason::LastPlayerStanding;
        }
        if state.round > limits.max_rounds {
            break StopReason::RoundLimit;
        }

        let Some(pending) = state.pending.clone() else {
            return Err(RunError::Stuck { phase: state.phase, round: state.round });
        };
        let player = pending.player();
        let agent = agents.iter_mut()
            .find(|a| a.player() == player)
            .ok_or(RunError::MissingAgent(player))?;

        let view = player_view(state, player);
        let action = agent.decide(&view)
            .ok_or(RunError::NoDecision { player, decision: pending.kind() })?;

        if let Err(violation) = engine::apply_action(state, action.clone(), rng) {
            rejections += 1;
            debug!(player = %player, agent = agent.name(), %violation, "decision rejected");
        }
        decisions += 1;
        on_step(state, &action);

        if decisions > limits.max_decisions {
            return Err(RunError::DecisionLimit { limit: limits.max_decisions, round: state.round });
        }
    };

    let summary = summarize(state, agents, stop, decisions, rejections);
    info!(
        stop = ?summary.stop,
        rounds = summary.rounds_completed,
        turns = summary.turns,
        decisions,
        rejections,
        "game stopped"
    );
    Ok(summary)
}

fn summarize(
    state: &GameState,
    agents: &[Box<dyn Agent>],
    stop: StopReason,
    decisions: usize,
    rejections: usize,
) -> GameSummary {
    let standings = state.players.iter()
        .map(|p| Standing {
            player: p.id,
            name: p.name.clone(),
            agent: agents.iter()
                .find(|a| a.player() == p.id)
                .map_or_else(String::new, |a| a.name().to_string()),
            territories: state.territory_count(p.id),
            armies: state.armies_of(p.id),
            cards: p.hand.len(),
            continents: state.map.continents().iter()
                .filter(|c| state.continent_owner(c.id) == Some(p.id))
                .count(),
            eliminated: p.eliminated,
        })
        .collect();

    GameSummary {
        stop,
        rounds_completed: state.round - 1,
        turns: state.turn - 1,
        decisions,
        rejections,
        events: state.log.len(),
        standings,
    }
}
