//! Fixed-capacity FIFO experience store with uniform sampling.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::index;

use causeway_core::errors::{AgentError, CausewayResult};

/// One transition, immutable once stored. The raw causal effect is
/// retained alongside the shaped reward for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    pub state: Vec<f64>,
    pub action: usize,
    pub reward: f64,
    pub next_state: Vec<f64>,
    pub done: bool,
    pub causal_effect: f64,
}

/// Ring-buffer replay memory: once at capacity, pushes evict the
/// oldest entry.
#[derive(Debug)]
pub struct ReplayBuffer {
    buffer: VecDeque<Experience>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an experience, evicting the oldest if at capacity.
    pub fn push(&mut self, experience: Experience) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(experience);
    }

    /// Uniform random sample without replacement. Callers must guard
    /// with `len()`; an oversized request is a precondition error.
    pub fn sample(&self, batch_size: usize, rng: &mut StdRng) -> CausewayResult<Vec<Experience>> {
        if batch_size > self.buffer.len() {
            return Err(AgentError::InsufficientData {
                requested: batch_size,
                available: self.buffer.len(),
            }
            .into());
        }
        Ok(index::sample(rng, self.buffer.len(), batch_size)
            .into_iter()
            .map(|i| self.buffer[i].clone())
            .collect())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The i-th oldest retained experience (test/diagnostic access).
    pub fn get(&self, index: usize) -> Option<&Experience> {
        self.buffer.get(index)
    }
}
