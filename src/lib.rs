//! Self-play deep Q-learning for a two-paddle Pong simulation.
//!
//! The crate is split into the learning agent (replay buffer, online/target
//! value networks, epsilon-greedy exploration) and the simulation
//! environment (paddle and ball kinematics, scoring, per-side
//! observations). A thin driver binary wires the two together.

pub mod agent;
pub mod config;
pub mod device;
pub mod environment;
pub mod error;
pub mod experience;
pub mod mlp;

/// Number of features in a per-side observation vector.
pub const OBS_DIM: usize = 5;

/// Normalized, side-relative view of the court handed to an agent.
pub type Observation = [f32; OBS_DIM];

pub use agent::DqnAgent;
pub use config::{AgentConfig, EnvConfig};
pub use environment::{Action, PongEnv, Rect, Side, StepResult};
pub use error::{Error, Result};
pub use experience::{ReplayBuffer, Transition};
