pub mod runner;
pub mod batch;
pub mod odds;

pub use runner::{run_game, run_game_observed, GameSummary, RunError, RunLimits, Standing, StopReason};
pub use batch::{make_agents, play_seeded, run_batch, BatchConfig, BatchReport, Lineup, StrategyRecord};
pub use odds::{probability_table, OddsTable};
