//! Transition records and the bounded replay buffer.

use std::collections::VecDeque;

use rand::rng;
use rand::seq::IteratorRandom;

use crate::Observation;
use crate::error::{Error, Result};

/// One recorded step of experience. Immutable once stored.
#[derive(Debug, Clone)]
pub struct Transition {
    pub observation: Observation,
    pub action: usize,
    pub reward: f32,
    pub next_observation: Observation,
    pub terminal: bool,
}

/// Fixed-capacity FIFO store of transitions with uniform batch sampling.
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay capacity must be positive");
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a transition, evicting the oldest one at capacity.
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draws `batch_size` transitions uniformly at random, without
    /// replacement within the batch. The returned order carries no meaning.
    pub fn sample(&self, batch_size: usize) -> Result<Vec<&Transition>> {
        if self.buffer.len() < batch_size {
            return Err(Error::InsufficientData {
                requested: batch_size,
                stored: self.buffer.len(),
            });
        }
        let mut rng = rng();
        Ok(self.buffer.iter().choose_multiple(&mut rng, batch_size))
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
