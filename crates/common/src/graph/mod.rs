//! # Graph building
//!
//! Turns the DOT description of a mind's neighbourhood into the node and link
//! arrays a renderer consumes, centered on a focal identity.
//!
//! ## Filtering
//!
//! Nodes are visited in source order:
//!
//! 1. a node whose `pubkey` equals the focal key is always kept, and its id
//!    becomes the focal id
//! 2. any other node is kept only if `ranking >= ranking_filter_percent / 100`
//!
//! Edges are kept only if both endpoints survived.
//!
//! ## The sink
//!
//! Every built graph ends with one synthetic sink node (id `-1`, labelled
//! "Intensify") and one synthetic link from the sink to the focal id. If the
//! focal key is absent from the text the focal id stays `-1`, so the synthetic
//! link loops on the sink. Renderers rely on that link always being present,
//! so the self-loop is emitted as-is.
//!
//! Unparseable text is not an error: it renders as the empty graph plus sink.

pub mod dot;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use self::dot::{Attributes, DotError, DotGraph};

/// Id of the synthetic sink node
pub const SINK_ID: i64 = -1;
/// Label of the synthetic sink node
pub const SINK_LABEL: &str = "Intensify";
/// Group of ordinary nodes
pub const NODE_GROUP: i64 = 1;
/// Group of the sink node
pub const SINK_GROUP: i64 = -1;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("graph text could not be parsed: {0}")]
    Dot(#[from] DotError),
    #[error("node id {0:?} is not an integer")]
    InvalidNodeId(String),
    #[error("node id {SINK_ID} is reserved for the sink")]
    ReservedNodeId,
    #[error("node id {0} is written more than one way")]
    DuplicateNodeId(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: i64,
    pub group: i64,
    pub label: String,
    pub pubkey: String,
    pub ranking: f64,
    pub locale: String,
    pub imbalance: f64,
}

impl GraphNode {
    pub fn sink() -> Self {
        Self {
            id: SINK_ID,
            group: SINK_GROUP,
            label: SINK_LABEL.to_string(),
            pubkey: String::new(),
            ranking: 0.0,
            locale: String::new(),
            imbalance: 0.0,
        }
    }

    pub fn is_sink(&self) -> bool {
        self.id == SINK_ID
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: i64,
    pub target: i64,
    pub value: f64,
    pub height: i64,
    pub time: i64,
}

impl GraphLink {
    fn sink(focal_id: i64) -> Self {
        Self {
            source: SINK_ID,
            target: focal_id,
            value: -1.0,
            height: -1,
            time: -1,
        }
    }
}

/// A built graph, ready for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl Graph {
    /// Only the sink node and its self-loop
    pub fn empty() -> Self {
        Self {
            nodes: vec![GraphNode::sink()],
            links: vec![GraphLink::sink(SINK_ID)],
        }
    }

    /// Target of the synthetic sink link
    pub fn focal_id(&self) -> i64 {
        self.links
            .iter()
            .rev()
            .find(|link| link.source == SINK_ID)
            .map(|link| link.target)
            .unwrap_or(SINK_ID)
    }

    pub fn node(&self, id: i64) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

fn text(attributes: &Attributes, key: &str) -> String {
    attributes.get(key).cloned().unwrap_or_default()
}

fn number(attributes: &Attributes, key: &str) -> f64 {
    attributes
        .get(key)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn integer(attributes: &Attributes, key: &str) -> i64 {
    attributes
        .get(key)
        .and_then(|value| {
            let value = value.trim();
            value.parse::<i64>().ok().or_else(|| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| v as i64)
            })
        })
        .unwrap_or(0)
}

fn node_id(id: &str) -> Result<i64, GraphError> {
    let parsed = id
        .parse::<i64>()
        .map_err(|_| GraphError::InvalidNodeId(id.to_string()))?;
    if parsed == SINK_ID {
        return Err(GraphError::ReservedNodeId);
    }
    Ok(parsed)
}

fn assemble(
    source: DotGraph,
    focal_key: &str,
    ranking_filter_percent: f64,
) -> Result<Graph, GraphError> {
    let threshold = if ranking_filter_percent.is_nan() {
        0.0
    } else {
        ranking_filter_percent.clamp(0.0, 100.0) / 100.0
    };

    let ids = source
        .nodes
        .iter()
        .map(|node| node_id(&node.id))
        .collect::<Result<Vec<_>, _>>()?;

    // `1` and `01` are distinct DOT ids but one graph id
    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(&id) = ids.iter().find(|&&id| !seen.insert(id)) {
        return Err(GraphError::DuplicateNodeId(id));
    }

    let mut focal_id = SINK_ID;
    let mut nodes = Vec::with_capacity(source.nodes.len() + 1);

    for (node, &id) in source.nodes.iter().zip(&ids) {
        let pubkey = text(&node.attributes, "pubkey");
        let ranking = number(&node.attributes, "ranking");

        let is_focal = !pubkey.is_empty() && pubkey == focal_key;
        if is_focal {
            focal_id = id;
        } else if ranking < threshold {
            continue;
        }

        nodes.push(GraphNode {
            id,
            group: NODE_GROUP,
            label: text(&node.attributes, "label"),
            pubkey,
            ranking,
            locale: text(&node.attributes, "locale"),
            imbalance: number(&node.attributes, "imbalance"),
        });
    }
    nodes.push(GraphNode::sink());

    let kept: HashSet<i64> = nodes.iter().map(|node| node.id).collect();
    let mut links = Vec::with_capacity(source.edges.len() + 1);
    for edge in &source.edges {
        let source_id = node_id(&edge.source)?;
        let target_id = node_id(&edge.target)?;
        if !kept.contains(&source_id) || !kept.contains(&target_id) {
            continue;
        }
        links.push(GraphLink {
            source: source_id,
            target: target_id,
            value: number(&edge.attributes, "weight"),
            height: integer(&edge.attributes, "height"),
            time: integer(&edge.attributes, "time"),
        });
    }
    links.push(GraphLink::sink(focal_id));

    Ok(Graph { nodes, links })
}

/// Build a graph, reporting unparseable text as an error
pub fn try_build(
    graph_text: &str,
    focal_key: &str,
    ranking_filter_percent: f64,
) -> Result<Graph, GraphError> {
    if graph_text.trim().is_empty() {
        return Ok(Graph::empty());
    }
    let source = dot::parse(graph_text)?;
    assemble(source, focal_key, ranking_filter_percent)
}

/// Build a graph, degrading unparseable text to [`Graph::empty`]
///
/// `ranking_filter_percent` is clamped to `[0, 100]`.
pub fn build(graph_text: &str, focal_key: &str, ranking_filter_percent: f64) -> Graph {
    match try_build(graph_text, focal_key, ranking_filter_percent) {
        Ok(graph) => {
            tracing::debug!(
                nodes = graph.nodes.len(),
                links = graph.links.len(),
                focal_id = graph.focal_id(),
                "built graph"
            );
            graph
        }
        Err(e) => {
            tracing::warn!(error = %e, "rendering empty graph");
            Graph::empty()
        }
    }
}
