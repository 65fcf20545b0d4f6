use std::collections::HashSet;

use rand::Rng;

use crate::config::{DragSchedule, LayoutConfig};

use super::types::Point;

/// Signed spring magnitude between two nodes `distance` apart.
///
/// Connected pairs are pulled toward `target` from either side. Unconnected
/// pairs only ever push apart, so the result is clamped to `<= 0`.
pub(crate) fn pair_magnitude(distance: f64, target: f64, connected: bool) -> f64 {
    let magnitude = distance - target;
    if connected { magnitude } else { magnitude.min(0.0) }
}

/// Static description of the system being relaxed: everything except the
/// positions, which the caller owns.
#[derive(Debug, Clone)]
pub(crate) struct ForceModel {
    radii: Vec<f64>,
    /// Index pairs `(lo, hi)` joined by at least one connection.
    connected: HashSet<(usize, usize)>,
    /// -1 for input nodes, +1 for output nodes, 0 otherwise (or both).
    bias: Vec<f64>,
    separation_factor: f64,
}

impl ForceModel {
    pub(crate) fn new(radii: Vec<f64>, separation_factor: f64) -> Self {
        let bias = vec![0.0; radii.len()];
        Self {
            radii,
            connected: HashSet::new(),
            bias,
            separation_factor,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.radii.len()
    }

    pub(crate) fn connect(&mut self, a: usize, b: usize) {
        if a != b {
            self.connected.insert((a.min(b), a.max(b)));
        }
    }

    pub(crate) fn is_connected(&self, a: usize, b: usize) -> bool {
        self.connected.contains(&(a.min(b), a.max(b)))
    }

    pub(crate) fn mark_input(&mut self, idx: usize) {
        self.bias[idx] -= 1.0;
    }

    pub(crate) fn mark_output(&mut self, idx: usize) {
        self.bias[idx] += 1.0;
    }

    pub(crate) fn target_separation(&self, a: usize, b: usize) -> f64 {
        self.separation_factor * (self.radii[a] + self.radii[b])
    }

    /// Net pairwise force on every node, without drag.
    ///
    /// Each pair contributes equal and opposite vectors, so the sum over all
    /// nodes is zero up to rounding.
    pub(crate) fn pairwise_forces(&self, positions: &[Point]) -> Vec<Point> {
        let mut forces = vec![Point::default(); positions.len()];
        for a in 0..positions.len() {
            for b in (a + 1)..positions.len() {
                let (dir, distance) = positions[a].direction_to(positions[b]);
                let magnitude = pair_magnitude(
                    distance,
                    self.target_separation(a, b),
                    self.is_connected(a, b),
                );
                let force = dir * magnitude;
                forces[a] += force;
                forces[b] -= force;
            }
        }
        forces
    }

    /// One explicit Euler step.
    pub(crate) fn step(&self, positions: &mut [Point], drag: f64, rate: f64) {
        let forces = self.pairwise_forces(positions);
        for ((pos, force), bias) in positions.iter_mut().zip(forces).zip(&self.bias) {
            let total = force + Point::new(bias * drag, 0.0);
            *pos += total * rate;
        }
    }
}

pub(crate) fn initial_positions<R: Rng>(count: usize, spread_per_node: f64, rng: &mut R) -> Vec<Point> {
    let side = spread_per_node * count as f64;
    (0..count)
        .map(|_| Point::new(rng.random::<f64>() * side, rng.random::<f64>() * side))
        .collect()
}

/// The `(drag, iterations)` phases a schedule runs for `count` nodes.
pub(crate) fn schedule_phases(config: &LayoutConfig, count: usize) -> Vec<(f64, usize)> {
    let iterations = config.iterations_per_node * count;
    match config.schedule {
        DragSchedule::Constant => vec![(config.constant_drag, iterations)],
        DragSchedule::Settle => vec![(config.settle_drag, iterations), (0.0, iterations)],
    }
}

pub(crate) fn relax(model: &ForceModel, positions: &mut [Point], config: &LayoutConfig) {
    for (phase, (drag, iterations)) in schedule_phases(config, model.len()).into_iter().enumerate() {
        log::debug!("relaxation phase {phase}: {iterations} steps, drag {drag}");
        for _ in 0..iterations {
            model.step(positions, drag, config.rate);
        }
    }
}
