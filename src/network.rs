use petgraph::dot::{Config, Dot};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{NetworkError, Result};
use crate::records::{EdgeRecord, NodeRecord};

pub const DEFAULT_TOP_N: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Centrality {
    pub degree: f64,
    pub betweenness: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    pub id: String,
    /// `None` for organizations that only appear as an edge endpoint.
    pub centrality: Option<Centrality>,
}

impl Organization {
    pub fn metrics(&self) -> Result<Centrality> {
        self.centrality
            .ok_or_else(|| NetworkError::MissingAttributes(self.id.clone()))
    }
}

/// Undirected collaboration graph keyed by organization id.
///
/// Nodes keep their first-insertion order; a repeated pair of endpoints
/// keeps a single edge carrying the last weight written.
#[derive(Debug, Clone, Default)]
pub struct CollabNetwork {
    graph: UnGraph<Organization, f64>,
    index: HashMap<String, NodeIndex>,
}

impl CollabNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &UnGraph<Organization, f64> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn organizations(&self) -> impl Iterator<Item = &Organization> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges as `(source id, target id, weight)`.
    pub fn collaborations(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.graph.edge_references().map(move |edge| {
            (
                self.graph[edge.source()].id.as_str(),
                self.graph[edge.target()].id.as_str(),
                *edge.weight(),
            )
        })
    }

    /// Insert an organization, overwriting the attributes of an existing one.
    pub fn add_organization(&mut self, id: &str, centrality: Option<Centrality>) -> NodeIndex {
        match self.index.get(id) {
            Some(&idx) => {
                if centrality.is_some() {
                    self.graph[idx].centrality = centrality;
                }
                idx
            }
            None => {
                let idx = self.graph.add_node(Organization {
                    id: id.to_string(),
                    centrality,
                });
                self.index.insert(id.to_string(), idx);
                idx
            }
        }
    }

    /// Insert an edge, creating bare endpoints for unknown ids.
    pub fn add_collaboration(&mut self, source: &str, target: &str, weight: f64) {
        let a = self.node_or_bare(source);
        let b = self.node_or_bare(target);
        self.graph.update_edge(a, b, weight);
    }

    fn node_or_bare(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        log::debug!("creating bare organization {} from edge table", id);
        self.add_organization(id, None)
    }

    /// Organizations created from the edge table alone.
    pub fn bare_organizations(&self) -> Vec<&str> {
        self.organizations()
            .filter(|org| org.centrality.is_none())
            .map(|org| org.id.as_str())
            .collect()
    }

    /// Independent copy of the subgraph induced by `ids`.
    ///
    /// Unknown ids are ignored. Node order follows this network.
    pub fn induced_subgraph(&self, ids: &HashSet<&str>) -> CollabNetwork {
        let mut sub = CollabNetwork::new();
        for org in self.organizations() {
            if ids.contains(org.id.as_str()) {
                sub.add_organization(&org.id, org.centrality);
            }
        }
        for (source, target, weight) in self.collaborations() {
            if sub.contains(source) && sub.contains(target) {
                sub.add_collaboration(source, target, weight);
            }
        }
        sub
    }
}

#[cfg(test)]
impl CollabNetwork {
    pub fn organization(&self, id: &str) -> Option<&Organization> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn has_collaboration(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }
}

pub fn build_network(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> CollabNetwork {
    let mut network = CollabNetwork::new();

    for row in nodes {
        network.add_organization(
            &row.organization_id,
            Some(Centrality {
                degree: row.degree_centrality,
                betweenness: row.betweenness,
            }),
        );
    }

    for row in edges {
        network.add_collaboration(&row.source, &row.target, row.weight);
    }

    log::info!(
        "Number of organizations in network: {}, collaborations: {}",
        network.node_count(),
        network.edge_count()
    );

    network
}

/// Node rows ordered by degree centrality, highest first. Ties keep input order.
pub fn rank_by_degree(nodes: &[NodeRecord]) -> Vec<&NodeRecord> {
    let mut ranked: Vec<&NodeRecord> = nodes.iter().collect();
    ranked.sort_by(|a, b| b.degree_centrality.total_cmp(&a.degree_centrality));
    ranked
}

pub fn top_n_ids(nodes: &[NodeRecord], n: usize) -> Vec<&str> {
    rank_by_degree(nodes)
        .into_iter()
        .take(n)
        .map(|row| row.organization_id.as_str())
        .collect()
}

pub fn top_n_subgraph(network: &CollabNetwork, nodes: &[NodeRecord], n: usize) -> CollabNetwork {
    let keep: HashSet<&str> = top_n_ids(nodes, n).into_iter().collect();
    let sub = network.induced_subgraph(&keep);

    log::info!(
        "Kept top {} organizations: {} nodes, {} collaborations",
        n,
        sub.node_count(),
        sub.edge_count()
    );

    sub
}

pub fn export_dot(network: &CollabNetwork, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let viz = Dot::with_attr_getters(
        network.graph(),
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &|_, edge| format!("weight={}", edge.weight()),
        &|_, (_, org)| {
            let label = match org.centrality {
                Some(c) => format!("{}: {:.3}", org.id, c.degree),
                None => org.id.clone(),
            };
            format!("label={:?}", label)
        },
    );

    std::fs::write(path, format!("{:?}", viz)).map_err(|e| NetworkError::io(path, e))
}
