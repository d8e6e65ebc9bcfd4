//! Feed-forward value-function approximator: ReLU hidden layers, linear
//! output, one scalar per action. Plain `Vec<f64>` math with an explicit
//! backward pass; parameters are serde types so they can be copied for
//! target-network sync and serialized for checkpointing.

pub mod optimizer;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use causeway_core::errors::{AgentError, CausewayResult};

/// One fully-connected layer. `weights[out][in]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl Layer {
    fn zeros_like(other: &Layer) -> Layer {
        Layer {
            weights: other
                .weights
                .iter()
                .map(|row| vec![0.0; row.len()])
                .collect(),
            biases: vec![0.0; other.biases.len()],
        }
    }
}

/// Activations recorded during a forward pass, for backprop.
pub struct ForwardTrace {
    /// Layer inputs: element 0 is the network input, element i the
    /// post-activation output of layer i-1.
    inputs: Vec<Vec<f64>>,
    /// Pre-activation sums per layer.
    pre_activations: Vec<Vec<f64>>,
}

impl ForwardTrace {
    /// The network output (linear, no activation on the last layer).
    pub fn output(&self) -> &[f64] {
        self.pre_activations
            .last()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Q(state) -> per-action values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QNetwork {
    state_size: usize,
    action_size: usize,
    layers: Vec<Layer>,
}

impl QNetwork {
    /// Build a network with Xavier-uniform weights and zero biases.
    /// Zero-sized dimensions are construction errors.
    pub fn new(
        state_size: usize,
        action_size: usize,
        hidden_sizes: &[usize],
        rng: &mut StdRng,
    ) -> CausewayResult<Self> {
        if state_size == 0 || action_size == 0 || hidden_sizes.contains(&0) {
            return Err(AgentError::InvalidArchitecture {
                reason: "layer sizes must be non-zero".to_string(),
            }
            .into());
        }

        let mut sizes = vec![state_size];
        sizes.extend_from_slice(hidden_sizes);
        sizes.push(action_size);

        let layers = sizes
            .windows(2)
            .map(|w| xavier_layer(w[0], w[1], rng))
            .collect();
        Ok(Self {
            state_size,
            action_size,
            layers,
        })
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Vec<Layer> {
        &mut self.layers
    }

    /// Deterministic forward pass.
    pub fn forward(&self, state: &[f64]) -> CausewayResult<Vec<f64>> {
        Ok(self.forward_trace(state)?.output().to_vec())
    }

    /// Forward pass retaining the activations needed for backprop.
    pub fn forward_trace(&self, state: &[f64]) -> CausewayResult<ForwardTrace> {
        if state.len() != self.state_size {
            return Err(AgentError::DimensionMismatch {
                expected: self.state_size,
                actual: state.len(),
            }
            .into());
        }

        let mut inputs = vec![state.to_vec()];
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        let last = self.layers.len() - 1;

        for (i, layer) in self.layers.iter().enumerate() {
            let input = &inputs[i];
            let z: Vec<f64> = layer
                .weights
                .iter()
                .zip(&layer.biases)
                .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + b)
                .collect();
            if i < last {
                inputs.push(z.iter().map(|v| v.max(0.0)).collect());
            }
            pre_activations.push(z);
        }

        Ok(ForwardTrace {
            inputs,
            pre_activations,
        })
    }

    /// Backpropagate `output_grad` (dLoss/dOutput) through the trace,
    /// returning per-layer gradients shaped like the parameters.
    pub fn backward(&self, trace: &ForwardTrace, output_grad: &[f64]) -> Vec<Layer> {
        let mut grads: Vec<Layer> = self.layers.iter().map(Layer::zeros_like).collect();
        let mut delta = output_grad.to_vec();

        for i in (0..self.layers.len()).rev() {
            let input = &trace.inputs[i];
            for (o, d) in delta.iter().enumerate() {
                grads[i].biases[o] += d;
                for (w, x) in grads[i].weights[o].iter_mut().zip(input) {
                    *w += d * x;
                }
            }
            if i == 0 {
                break;
            }
            // Propagate through the previous layer's ReLU.
            let prev_pre = &trace.pre_activations[i - 1];
            let mut next_delta = vec![0.0; input.len()];
            for (o, d) in delta.iter().enumerate() {
                for (j, w) in self.layers[i].weights[o].iter().enumerate() {
                    next_delta[j] += d * w;
                }
            }
            for (nd, z) in next_delta.iter_mut().zip(prev_pre) {
                if *z <= 0.0 {
                    *nd = 0.0;
                }
            }
            delta = next_delta;
        }
        grads
    }

    /// Accumulate `other` into `acc` elementwise (for batch gradients).
    pub fn accumulate(acc: &mut [Layer], other: &[Layer]) {
        for (a, o) in acc.iter_mut().zip(other) {
            for (aw, ow) in a.weights.iter_mut().zip(&o.weights) {
                for (x, y) in aw.iter_mut().zip(ow) {
                    *x += y;
                }
            }
            for (x, y) in a.biases.iter_mut().zip(&o.biases) {
                *x += y;
            }
        }
    }

    /// Zero-shaped gradient buffers for this network.
    pub fn zero_grads(&self) -> Vec<Layer> {
        self.layers.iter().map(Layer::zeros_like).collect()
    }
}

fn xavier_layer(fan_in: usize, fan_out: usize, rng: &mut StdRng) -> Layer {
    let bound = (6.0 / (fan_in + fan_out) as f64).sqrt();
    Layer {
        weights: (0..fan_out)
            .map(|_| (0..fan_in).map(|_| rng.gen_range(-bound..bound)).collect())
            .collect(),
        biases: vec![0.0; fan_out],
    }
}
