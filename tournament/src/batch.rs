// ═══════════════════════════════════════════════════════════════════════
// Batch — many seeded games in parallel, aggregated per strategy
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::{run_game, GameSummary, RunError, RunLimits};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use risk_agents::{Agent, AgentKind};
use risk_engine::map::MapGraph;
use risk_engine::setup::create_initial_state;
use risk_engine::types::*;
use risk_engine::RulesConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Which strategy sits in which seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lineup {
    /// Every seat plays the same strategy.
    Uniform(AgentKind),
    /// Seats cycle through every built-in strategy.
    Mixed,
    /// One strategy per seat, repeated if there are more seats.
    Custom(Vec<AgentKind>),
}

impl Lineup {
    pub fn seats(&self, players: usize) -> Vec<AgentKind> {
        let cycle: &[AgentKind] = match self {
            Lineup::Uniform(kind) => std::slice::from_ref(kind),
            Lineup::Mixed => &AgentKind::ALL[..],
            Lineup::Custom(kinds) if !kinds.is_empty() => kinds.as_slice(),
            Lineup::Custom(_) => &[AgentKind::Random],
        };
        cycle.iter().copied().cycle().take(players).collect()
    }
}

impl std::str::FromStr for Lineup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("mixed") {
            return Ok(Lineup::Mixed);
        }
        let kinds = s.split(',')
            .map(|k| k.trim().parse::<AgentKind>())
            .collect::<Result<Vec<_>, _>>()?;
        match kinds.as_slice() {
            [one] => Ok(Lineup::Uniform(*one)),
            _ => Ok(Lineup::Custom(kinds)),
        }
    }
}

/// One agent per seat. Seat `i` gets seed `seed + i`.
pub fn make_agents(lineup: &Lineup, players: usize, seed: u64) -> Vec<Box<dyn Agent>> {
    lineup.seats(players).into_iter()
        .enumerate()
        .map(|(i, kind)| kind.build(PlayerId(i as u8), seed.wrapping_add(i as u64)))
        .collect()
}

/// Set up and play one game from `seed`. Setup and dice share one generator.
pub fn play_seeded(
    map: Arc<MapGraph>,
    rules: RulesConfig,
    lineup: &Lineup,
    players: usize,
    seed: u64,
    limits: RunLimits,
) -> Result<(GameState, GameSummary), RunError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let kinds = lineup.seats(players);
    let names: Vec<String> = kinds.iter()
        .enumerate()
        .map(|(i, k)| format!("{}-{}", k, i + 1))
        .collect();

    let mut state = create_initial_state(map, &names, rules, &mut rng)?;
    let mut agents = make_agents(lineup, players, seed);
    let summary = run_game(&mut state, &mut agents, &mut rng, limits)?;
    Ok((state, summary))
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub map: Arc<MapGraph>,
    pub rules: RulesConfig,
    pub lineup: Lineup,
    pub players: usize,
    pub games: u32,
    /// Game `g` is seeded with `seed + g`.
    pub seed: u64,
    pub limits: RunLimits,
}

/// Totals for every seat played by one strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecord {
    pub seats: u32,
    /// Games where this seat led on territories when the run stopped.
    pub leads: u32,
    pub eliminated: u32,
    pub territories: u64,
    pub armies: u64,
}

impl StrategyRecord {
    pub fn lead_rate(&self) -> f64 {
        if self.seats == 0 { 0.0 } else { self.leads as f64 / self.seats as f64 }
    }

    pub fn avg_territories(&self) -> f64 {
        if self.seats == 0 { 0.0 } else { self.territories as f64 / self.seats as f64 }
    }

    pub fn avg_armies(&self) -> f64 {
        if self.seats == 0 { 0.0 } else { self.armies as f64 / self.seats as f64 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub games: u32,
    pub completed: u32,
    pub total_rounds: u64,
    pub total_rejections: u64,
    /// (seed, error) for every game that could not finish.
    pub failures: Vec<(u64, String)>,
    pub records: BTreeMap<AgentKind, StrategyRecord>,
}

impl BatchReport {
    fn absorb(&mut self, kinds: &[AgentKind], summary: &GameSummary) {
        self.completed += 1;
        self.total_rounds += u64::from(summary.rounds_completed);
        self.total_rejections += summary.rejections as u64;

        let leader = summary.leader().map(|s| s.player);
        for standing in &summary.standings {
            let Some(&kind) = kinds.get(standing.player.0 as usize) else {
                continue;
            };
            let record = self.records.entry(kind).or_default();
            record.seats += 1;
            record.leads += u32::from(leader == Some(standing.player));
            record.eliminated += u32::from(standing.eliminated);
            record.territories += standing.territories as u64;
            record.armies += u64::from(standing.armies);
        }
    }
}

/// Run `config.games` games on the rayon pool and aggregate the results.
/// Each game owns its state and generator; only the map is shared.
pub fn run_batch(config: &BatchConfig) -> BatchReport {
    info!(games = config.games, players = config.players, lineup = ?config.lineup, "starting batch");

    let outcomes: Vec<(u64, Result<GameSummary, RunError>)> = (0..config.games)
        .into_par_iter()
        .map(|g| {
            let seed = config.seed.wrapping_add(u64::from(g));
            let result = play_seeded(
                Arc::clone(&config.map),
                config.rules.clone(),
                &config.lineup,
                config.players,
                seed,
                config.limits,
            )
            .map(|(_, summary)| summary);
            (seed, result)
        })
        .collect();

    let kinds = config.lineup.seats(config.players);
    let mut report = BatchReport { games: config.games, ..BatchReport::default() };
    for (seed, outcome) in outcomes {
        match outcome {
            Ok(summary) => report.absorb(&kinds, &summary),
            Err(e) => {
                warn!(seed, error = %e, "game failed");
                report.failures.push((seed, e.to_string()));
            }
        }
    }

    info!(completed = report.completed, failed = report.failures.len(), "batch finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lineups_fill_every_seat() {
        assert_eq!(Lineup::Mixed.seats(4), vec![
            AgentKind::Aggressive, AgentKind::Passive, AgentKind::Random, AgentKind::Aggressive,
        ]);
        assert_eq!(Lineup::Uniform(AgentKind::Passive).seats(3), vec![AgentKind::Passive; 3]);
        assert_eq!(Lineup::Custom(vec![]).seats(2), vec![AgentKind::Random; 2]);
    }

    #[test]
    fn lineup_parses() {
        assert_eq!("mixed".parse::<Lineup>(), Ok(Lineup::Mixed));
        assert_eq!("aggressive".parse::<Lineup>(), Ok(Lineup::Uniform(AgentKind::Aggressive)));
        assert_eq!(
            "aggressive, passive".parse::<Lineup>(),
            Ok(Lineup::Custom(vec![AgentKind::Aggressive, AgentKind::Passive]))
        );
        assert!("aggressive,turtle".parse::<Lineup>().is_err());
    }

    #[test]
    fn agents_sit_in_their_seats() {
        let agents = make_agents(&Lineup::Mixed, 3, 7);
        let seats: Vec<PlayerId> = agents.iter().map(|a| a.player()).collect();
        assert_eq!(seats, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
        assert_eq!(agents[1].name(), "Passive");
    }

    #[test]
    fn record_rates() {
        let r = StrategyRecord { seats: 4, leads: 1, eliminated: 0, territories: 40, armies: 100 };
        assert_eq!(r.lead_rate(), 0.25);
        assert_eq!(r.avg_territories(), 10.0);
        assert_eq!(StrategyRecord::default().avg_armies(), 0.0);
    }
}
