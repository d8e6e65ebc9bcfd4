//! Adam optimizer with global gradient-norm clipping. Moment state is
//! serializable so checkpoints restore the exact optimizer trajectory.

use serde::{Deserialize, Serialize};

use super::Layer;

/// Adam with bias-corrected first and second moments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    /// Update count for bias correction.
    t: u64,
    m: Vec<Layer>,
    v: Vec<Layer>,
}

impl Adam {
    pub fn new(learning_rate: f64, params: &[Layer]) -> Self {
        let zeros: Vec<Layer> = params
            .iter()
            .map(|l| Layer {
                weights: l.weights.iter().map(|r| vec![0.0; r.len()]).collect(),
                biases: vec![0.0; l.biases.len()],
            })
            .collect();
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            t: 0,
            m: zeros.clone(),
            v: zeros,
        }
    }

    /// One Adam update in place.
    pub fn step(&mut self, params: &mut [Layer], grads: &[Layer]) {
        self.t += 1;
        let bc1 = 1.0 - self.beta1.powi(self.t as i32);
        let bc2 = 1.0 - self.beta2.powi(self.t as i32);

        for (l, (param, grad)) in params.iter_mut().zip(grads).enumerate() {
            for o in 0..param.weights.len() {
                for i in 0..param.weights[o].len() {
                    let g = grad.weights[o][i];
                    let m = &mut self.m[l].weights[o][i];
                    let v = &mut self.v[l].weights[o][i];
                    *m = self.beta1 * *m + (1.0 - self.beta1) * g;
                    *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
                    param.weights[o][i] -=
                        self.learning_rate * (*m / bc1) / ((*v / bc2).sqrt() + self.epsilon);
                }
            }
            for i in 0..param.biases.len() {
                let g = grad.biases[i];
                let m = &mut self.m[l].biases[i];
                let v = &mut self.v[l].biases[i];
                *m = self.beta1 * *m + (1.0 - self.beta1) * g;
                *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
                param.biases[i] -=
                    self.learning_rate * (*m / bc1) / ((*v / bc2).sqrt() + self.epsilon);
            }
        }
    }
}

/// Scale gradients so their global L2 norm does not exceed `max_norm`.
/// Bounds update magnitude under the shaped, non-stationary reward.
pub fn clip_grad_norm(grads: &mut [Layer], max_norm: f64) {
    let mut sum_sq = 0.0;
    for layer in grads.iter() {
        for row in &layer.weights {
            for w in row {
                sum_sq += w * w;
            }
        }
        for b in &layer.biases {
            sum_sq += b * b;
        }
    }
    let norm = sum_sq.sqrt();
    if norm <= max_norm || norm == 0.0 {
        return;
    }
    let scale = max_norm / norm;
    for layer in grads.iter_mut() {
        for row in &mut layer.weights {
            for w in row {
                *w *= scale;
            }
        }
        for b in &mut layer.biases {
            *b *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(w: f64) -> Layer {
        Layer {
            weights: vec![vec![w, w]],
            biases: vec![w],
        }
    }

    #[test]
    fn clipping_preserves_direction() {
        let mut grads = vec![layer(3.0)];
        clip_grad_norm(&mut grads, 1.0);
        let norm: f64 = grads[0]
            .weights
            .iter()
            .flatten()
            .chain(&grads[0].biases)
            .map(|g| g * g)
            .sum::<f64>()
            .sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        // All components scaled equally.
        assert!((grads[0].weights[0][0] - grads[0].biases[0]).abs() < 1e-12);
    }

    #[test]
    fn small_gradients_untouched() {
        let mut grads = vec![layer(0.1)];
        let before = grads[0].clone();
        clip_grad_norm(&mut grads, 10.0);
        assert_eq!(grads[0], before);
    }

    #[test]
    fn adam_descends_a_quadratic() {
        // Minimize f(w) = w^2 starting from w = 1.
        let mut params = vec![Layer {
            weights: vec![vec![1.0]],
            biases: vec![],
        }];
        let mut adam = Adam::new(0.1, &params);
        for _ in 0..200 {
            let grads = vec![Layer {
                weights: vec![vec![2.0 * params[0].weights[0][0]]],
                biases: vec![],
            }];
            adam.step(&mut params, &grads);
        }
        assert!(params[0].weights[0][0].abs() < 1e-2);
    }
}
