//! Constellation lines between nearby memory cards.
//!
//! Each point is linked to its `k` nearest neighbors. The resulting graph is
//! undirected: a pair appears once no matter which endpoint picked it.

use std::collections::BTreeSet;

use glam::Vec3;

use crate::error::ConfigError;

/// Undirected edge, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    /// Order the endpoints. Returns `None` for a self-loop.
    pub fn new(i: usize, j: usize) -> Option<Self> {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => Some(Self { a: i, b: j }),
            std::cmp::Ordering::Greater => Some(Self { a: j, b: i }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborGraph {
    edges: Vec<Edge>,
    point_count: usize,
}

impl NeighborGraph {
    /// Link every point to its `k` nearest neighbors.
    ///
    /// Distances tie-break on index, so the result depends only on the
    /// points and `k`. Fails when `k >= points.len()`. `k == 0` gives a
    /// graph with no edges.
    pub fn build(points: &[Vec3], k: usize) -> Result<Self, ConfigError> {
        if k >= points.len() {
            return Err(ConfigError::NeighborCount {
                neighbors: k,
                points: points.len(),
            });
        }

        let mut edges = BTreeSet::new();
        let mut by_distance: Vec<(f32, usize)> = Vec::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            by_distance.clear();
            by_distance.extend(
                points
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(j, q)| (p.distance_squared(*q), j)),
            );
            by_distance.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));

            edges.extend(by_distance.iter().take(k).filter_map(|&(_, j)| Edge::new(i, j)));
        }

        log::debug!("constellation: {} points, k={}, {} edges", points.len(), k, edges.len());

        Ok(Self {
            edges: edges.into_iter().collect(),
            point_count: points.len(),
        })
    }

    /// Edges sorted by `(a, b)`.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        Edge::new(i, j).is_some_and(|edge| self.edges.binary_search(&edge).is_ok())
    }

    pub fn degree(&self, i: usize) -> usize {
        self.edges.iter().filter(|e| e.a == i || e.b == i).count()
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Line endpoints for each edge. Edges referring past the end of
    /// `points` are skipped.
    pub fn segments(&self, points: &[Vec3]) -> Vec<(Vec3, Vec3)> {
        self.edges
            .iter()
            .filter_map(|e| Some((*points.get(e.a)?, *points.get(e.b)?)))
            .collect()
    }
}
