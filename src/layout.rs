//! Force-directed placement for the filtered network.

use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use crate::error::{NetworkError, Result};
use crate::network::CollabNetwork;

const MIN_DISTANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Fruchterman-Reingold spring layout parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringLayout {
    /// Optimal distance between nodes. `None` uses `sqrt(1 / n)`.
    pub k: Option<f64>,
    pub iterations: usize,
    pub seed: u64,
    /// Stop early once the mean node displacement drops below this.
    pub threshold: f64,
    /// Largest absolute coordinate after rescaling.
    pub scale: f64,
    /// Scale attraction by edge weight instead of treating every edge as 1.
    pub weighted: bool,
}

impl Default for SpringLayout {
    fn default() -> Self {
        SpringLayout {
            k: Some(0.3),
            iterations: 20,
            seed: 42,
            threshold: 1e-4,
            scale: 1.0,
            weighted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    positions: HashMap<String, Point>,
}

impl Layout {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn position(&self, id: &str) -> Result<Point> {
        self.get(id)
            .ok_or_else(|| NetworkError::MissingPosition(id.to_string()))
    }
}

impl SpringLayout {
    /// Rejects parameters that would turn every coordinate into NaN.
    pub fn validate(&self) -> Result<()> {
        if let Some(k) = self.k {
            if !k.is_finite() || k <= 0.0 {
                return Err(NetworkError::InvalidParameter(format!(
                    "spring distance k must be a positive number, got {k}"
                )));
            }
        }
        if !self.scale.is_finite() {
            return Err(NetworkError::InvalidParameter(format!(
                "layout scale must be finite, got {}",
                self.scale
            )));
        }
        Ok(())
    }

    pub fn compute(&self, network: &CollabNetwork) -> Result<Layout> {
        self.validate()?;
        let graph = network.graph();
        let n = graph.node_count();
        let ids: Vec<&str> = network.organizations().map(|org| org.id.as_str()).collect();

        let coords = match n {
            0 => Vec::new(),
            1 => vec![[0.0, 0.0]],
            _ => {
                // Neighbour lists keep memory linear in the edge count.
                let mut neighbours: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
                for edge in graph.edge_references() {
                    let (a, b) = (edge.source().index(), edge.target().index());
                    if a == b {
                        continue;
                    }
                    let w = if self.weighted { *edge.weight() } else { 1.0 };
                    neighbours[a].push((b, w));
                    neighbours[b].push((a, w));
                }
                let mut rng = StdRng::seed_from_u64(self.seed);
                let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen(), rng.gen()]).collect();
                self.relax(&mut pos, &neighbours);
                rescale(&mut pos, self.scale);
                pos
            }
        };

        let positions = ids
            .iter()
            .zip(coords)
            .map(|(id, [x, y])| (id.to_string(), Point { x, y }))
            .collect();

        log::debug!("computed spring layout for {} organizations", n);
        Ok(Layout { positions })
    }

    fn relax(&self, pos: &mut [[f64; 2]], neighbours: &[Vec<(usize, f64)>]) {
        let n = pos.len();
        let k = self.k.unwrap_or_else(|| (1.0 / n as f64).sqrt());

        let extent = |axis: usize| {
            let (lo, hi) = pos.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
            hi - lo
        };
        let mut t = extent(0).max(extent(1)) * 0.1;
        let dt = t / (self.iterations as f64 + 1.0);

        let mut step = vec![[0.0; 2]; n];
        for iteration in 0..self.iterations {
            for i in 0..n {
                let mut disp = [0.0f64; 2];
                for j in 0..n {
                    let delta = [pos[i][0] - pos[j][0], pos[i][1] - pos[j][1]];
                    let distance = delta[0].hypot(delta[1]).max(MIN_DISTANCE);
                    let repulsion = k * k / (distance * distance);
                    disp[0] += delta[0] * repulsion;
                    disp[1] += delta[1] * repulsion;
                }
                for &(j, weight) in &neighbours[i] {
                    let delta = [pos[i][0] - pos[j][0], pos[i][1] - pos[j][1]];
                    let distance = delta[0].hypot(delta[1]).max(MIN_DISTANCE);
                    let attraction = weight * distance / k;
                    disp[0] -= delta[0] * attraction;
                    disp[1] -= delta[1] * attraction;
                }
                let mut length = disp[0].hypot(disp[1]);
                if length < MIN_DISTANCE {
                    length = 0.1;
                }
                step[i] = [disp[0] * t / length, disp[1] * t / length];
            }

            let mut moved: f64 = 0.0;
            for (p, s) in pos.iter_mut().zip(&step) {
                p[0] += s[0];
                p[1] += s[1];
                moved += s[0] * s[0] + s[1] * s[1];
            }
            t -= dt;

            if moved.sqrt() / (n as f64) < self.threshold {
                log::debug!("spring layout settled after {} iterations", iteration + 1);
                break;
            }
        }
    }
}

/// Centre on the origin and scale so the largest coordinate magnitude is `scale`.
fn rescale(pos: &mut [[f64; 2]], scale: f64) {
    let n = pos.len() as f64;
    let mean = pos
        .iter()
        .fold([0.0, 0.0], |acc, p| [acc[0] + p[0] / n, acc[1] + p[1] / n]);
    let mut lim: f64 = 0.0;
    for p in pos.iter_mut() {
        p[0] -= mean[0];
        p[1] -= mean[1];
        lim = lim.max(p[0].abs()).max(p[1].abs());
    }
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p[0] *= scale / lim;
            p[1] *= scale / lim;
        }
    }
}
