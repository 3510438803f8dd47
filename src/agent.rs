//! DQN learning agent: epsilon-greedy action selection, experience
//! ingestion, and a target-network-stabilized training step.

use std::path::Path;

use candle_core::{D, Tensor};
use candle_nn::{Optimizer, loss};
use candle_optimisers::adam::{Adam, ParamsAdam};
use rand::{Rng, rng};

use crate::config::AgentConfig;
use crate::device::DEVICE;
use crate::error::{Error, Result};
use crate::experience::{ReplayBuffer, Transition};
use crate::mlp::MultiLayerPerceptron;
use crate::{OBS_DIM, Observation};

/// Hidden layer widths of the value network.
const HIDDEN: [usize; 2] = [128, 64];

pub struct DqnAgent {
    online: MultiLayerPerceptron,
    target: MultiLayerPerceptron,
    optimiser: Adam,
    replay: ReplayBuffer,
    config: AgentConfig,
    epsilon: f32,
    train_steps: usize,
}

impl DqnAgent {
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;

        let topology = [OBS_DIM, HIDDEN[0], HIDDEN[1], config.action_count];
        let online = MultiLayerPerceptron::new(&topology)?;
        let target = MultiLayerPerceptron::new(&topology)?;
        target.copy_weights_from(&online)?;

        let optimiser = Adam::new(
            online.all_vars(),
            ParamsAdam {
                lr: config.learning_rate,
                ..Default::default()
            },
        )?;

        Ok(Self {
            online,
            target,
            optimiser,
            replay: ReplayBuffer::new(config.replay_capacity),
            epsilon: config.epsilon_start,
            train_steps: 0,
            config,
        })
    }

    /// Epsilon-greedy action selection over the online network.
    ///
    /// With probability `epsilon` a uniformly random action index is
    /// returned; otherwise the greedy one, ties broken by lowest index.
    pub fn select_action(&self, observation: &Observation) -> Result<usize> {
        let mut rng = rng();
        if rng.random::<f32>() < self.epsilon {
            return Ok(rng.random_range(0..self.config.action_count));
        }
        let values = self.action_values(observation)?;
        Ok(argmax(&values))
    }

    /// Q-values of every action under the online network.
    pub fn action_values(&self, observation: &Observation) -> Result<Vec<f32>> {
        Self::values_from(&self.online, observation)
    }

    fn values_from(net: &MultiLayerPerceptron, observation: &Observation) -> Result<Vec<f32>> {
        let input = Tensor::from_slice(observation.as_slice(), (1, OBS_DIM), &DEVICE)?;
        Ok(net.forward(&input)?.squeeze(0)?.to_vec1::<f32>()?)
    }

    /// Stores one transition in the replay buffer.
    pub fn ingest(&mut self, transition: Transition) {
        self.replay.push(transition);
    }

    /// One bootstrapped value-regression step on a sampled batch.
    ///
    /// Returns `Ok(None)` without side effects while the buffer holds fewer
    /// than `batch_size` transitions; that is the expected steady state
    /// early in training, not an error. After an executed step the target
    /// network is re-synced every `update_target_every` steps and epsilon
    /// decays toward its floor.
    pub fn train_step(&mut self, batch_size: usize) -> Result<Option<f32>> {
        if batch_size == 0 {
            return Err(Error::InvalidConfig("batch size must be positive".into()));
        }
        if self.replay.len() < batch_size {
            return Ok(None);
        }

        let batch = self.replay.sample(batch_size)?;

        let mut observations = Vec::with_capacity(batch_size * OBS_DIM);
        let mut next_observations = Vec::with_capacity(batch_size * OBS_DIM);
        let mut actions = Vec::with_capacity(batch_size);
        for transition in &batch {
            observations.extend_from_slice(&transition.observation);
            next_observations.extend_from_slice(&transition.next_observation);
            actions.push(transition.action as u32);
        }
        let observation_tensor = Tensor::from_slice(&observations, (batch_size, OBS_DIM), &DEVICE)?;
        let next_observation_tensor =
            Tensor::from_slice(&next_observations, (batch_size, OBS_DIM), &DEVICE)?;
        let action_tensor = Tensor::from_slice(&actions, (batch_size, 1), &DEVICE)?;

        // Regression targets bootstrap from the frozen target network; a
        // terminal transition contributes its reward alone.
        let next_values = self
            .target
            .forward(&next_observation_tensor)?
            .max(D::Minus1)?
            .to_vec1::<f32>()?;
        let targets: Vec<f32> = batch
            .iter()
            .zip(&next_values)
            .map(|(transition, next_value)| {
                if transition.terminal {
                    transition.reward
                } else {
                    transition.reward + self.config.gamma * next_value
                }
            })
            .collect();
        let target_tensor = Tensor::from_vec(targets, (batch_size, 1), &DEVICE)?;

        let predicted = self
            .online
            .forward(&observation_tensor)?
            .gather(&action_tensor, D::Minus1)?;
        let loss = loss::mse(&predicted, &target_tensor)?;
        self.optimiser.backward_step(&loss)?;

        self.train_steps += 1;
        if self.train_steps % self.config.update_target_every == 0 {
            self.target.copy_weights_from(&self.online)?;
            tracing::debug!(step = self.train_steps, "synced target network");
        }
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_min);

        Ok(Some(loss.to_scalar::<f32>()?))
    }

    /// Persists the online network parameters.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.online.save(&path)?;
        tracing::info!(path = %path.as_ref().display(), "saved model");
        Ok(())
    }

    /// Restores the online network parameters and refreshes the target from
    /// them, so the pair is never left inconsistent.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ModelNotFound {
                path: path.to_path_buf(),
            });
        }
        self.online.load(path)?;
        self.target.copy_weights_from(&self.online)?;
        tracing::info!(path = %path.display(), "loaded model");
        Ok(())
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Overrides the exploration rate; evaluation runs set it to 0.
    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn replay_len(&self) -> usize {
        self.replay.len()
    }

    pub fn train_steps(&self) -> usize {
        self.train_steps
    }
}

/// Index of the greatest value; the first (lowest) index wins ties.
fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = i;
        }
    }
    best
}
