//! Central configuration for the agent and the simulation.
//!
//! Defaults mirror the reference training setup; constructors call
//! `validate` so malformed values are rejected up front instead of
//! surfacing mid-run.

use crate::error::{Error, Result};

/// Hyperparameters for one [`DqnAgent`](crate::agent::DqnAgent).
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Number of discrete actions the agent chooses between.
    pub action_count: usize,
    /// Adam learning rate for the online network.
    pub learning_rate: f64,
    /// Discount factor applied to the bootstrapped next-state value.
    pub gamma: f32,
    /// Initial exploration rate.
    pub epsilon_start: f32,
    /// Multiplicative decay applied after every executed training step.
    pub epsilon_decay: f32,
    /// Exploration floor.
    pub epsilon_min: f32,
    /// Replay buffer capacity.
    pub replay_capacity: usize,
    /// Executed training steps between target network syncs.
    pub update_target_every: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            action_count: 3,
            learning_rate: 0.001,
            gamma: 0.99,
            epsilon_start: 1.0,
            epsilon_decay: 0.995,
            epsilon_min: 0.01,
            replay_capacity: 10_000,
            update_target_every: 1000,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.action_count == 0 {
            return Err(Error::InvalidConfig("action_count must be positive".into()));
        }
        if self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig("learning_rate must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(Error::InvalidConfig("gamma must lie in [0, 1]".into()));
        }
        if self.replay_capacity == 0 {
            return Err(Error::InvalidConfig("replay_capacity must be positive".into()));
        }
        if self.update_target_every == 0 {
            return Err(Error::InvalidConfig(
                "update_target_every must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon_min)
            || !(0.0..=1.0).contains(&self.epsilon_start)
            || self.epsilon_min > self.epsilon_start
        {
            return Err(Error::InvalidConfig(
                "epsilon bounds must satisfy 0 <= epsilon_min <= epsilon_start <= 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon_decay) {
            return Err(Error::InvalidConfig(
                "epsilon_decay must lie in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Court geometry and kinematics for [`PongEnv`](crate::environment::PongEnv).
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Horizontal inset of each paddle from its wall.
    pub paddle_inset: f32,
    pub ball_size: f32,
    /// Vertical distance a paddle covers per tick.
    pub paddle_speed: f32,
    /// Per-axis ball speed; velocity components are always `±ball_speed` or 0.
    pub ball_speed: f32,
    /// Score at which the episode terminates.
    pub winning_score: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            paddle_width: 15.0,
            paddle_height: 90.0,
            paddle_inset: 50.0,
            ball_size: 15.0,
            paddle_speed: 7.0,
            ball_speed: 7.0,
            winning_score: 10,
        }
    }
}

impl EnvConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_size", self.ball_size),
            ("paddle_speed", self.paddle_speed),
            ("ball_speed", self.ball_speed),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if self.paddle_height > self.height {
            return Err(Error::InvalidConfig(
                "paddle_height must not exceed the court height".into(),
            ));
        }
        if self.paddle_inset + self.paddle_width >= self.width / 2.0 {
            return Err(Error::InvalidConfig(
                "paddles must sit strictly inside their half of the court".into(),
            ));
        }
        if self.winning_score == 0 {
            return Err(Error::InvalidConfig("winning_score must be positive".into()));
        }
        Ok(())
    }
}
