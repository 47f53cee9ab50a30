pub mod types;
pub mod error;
pub mod rules;
pub mod map;
pub mod cards;
pub mod combat;
pub mod reinforcement;
pub mod navigation;
pub mod events;
pub mod setup;
pub mod engine;
pub mod visibility;
pub mod invariants;

pub use types::*;
pub use error::{ConfigError, RuleViolation};
pub use rules::{RulesConfig, TradeScoring};
pub use map::{MapDefinition, MapGraph};
pub use events::{EventLog, EventRecord, GameEvent};
pub use engine::{advance, apply_action, Action};
pub use visibility::{player_view, PlayerView};
