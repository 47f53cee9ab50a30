pub mod agent;
pub mod aggressive;
pub mod passive;
pub mod random;

#[cfg(test)]
mod testing;

pub use agent::{Agent, AgentKind};
pub use aggressive::AggressiveAgent;
pub use passive::PassiveAgent;
pub use random::RandomAgent;
