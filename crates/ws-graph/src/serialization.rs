use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use ws_core::errors::{ErrorInfo, WsError};
use ws_core::provenance::SchemaVersion;
use ws_core::NodeId;

use crate::adjacency::AdjacencyStructure;

/// Schema version written into JSON payloads.
pub const GRAPH_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Output encodings supported by the writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One line per node: `<node> <n_0> ... <n_{k-1}>`.
    #[default]
    Adjlist,
    /// Pretty-printed JSON document with schema version.
    Json,
}

/// Writes the structure in the given format.
pub fn write_graph<W: Write>(
    graph: &AdjacencyStructure,
    format: OutputFormat,
    writer: &mut W,
) -> Result<(), WsError> {
    match format {
        OutputFormat::Adjlist => write_adjlist(graph, writer),
        OutputFormat::Json => {
            let json = graph_to_json(graph)?;
            writeln!(writer, "{json}")?;
            Ok(())
        }
    }
}

/// Writes one line per node in ascending order: the node id followed by its
/// neighbours in slot order, space separated.
pub fn write_adjlist<W: Write>(graph: &AdjacencyStructure, writer: &mut W) -> Result<(), WsError> {
    for (node, row) in graph.rows() {
        write!(writer, "{node}")?;
        for target in row {
            write!(writer, " {target}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Renders the adjacency list into a string.
pub fn adjlist_to_string(graph: &AdjacencyStructure) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_adjlist(graph, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Reads an adjacency list written by [`write_adjlist`].
///
/// Blank lines and `#` comments are skipped. Every node in `[0, N)` must
/// appear exactly once as a line head and all rows must have equal length.
pub fn read_adjlist<R: BufRead>(reader: R) -> Result<AdjacencyStructure, WsError> {
    let mut rows: BTreeMap<u64, Vec<NodeId>> = BTreeMap::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let mut tokens = content.split_whitespace().map(|token| parse_id(token, line_no + 1));
        let Some(head) = tokens.next() else {
            continue;
        };
        let head = head?;
        let row = tokens.collect::<Result<Vec<_>, _>>()?;
        if rows.insert(head.as_raw(), row).is_some() {
            return Err(WsError::Serde(
                ErrorInfo::new("duplicate-node", "node appears on more than one line")
                    .with_context("node", head)
                    .with_context("line", line_no + 1),
            ));
        }
    }
    for (expected, node) in rows.keys().enumerate() {
        if *node != expected as u64 {
            return Err(WsError::Serde(
                ErrorInfo::new("missing-node", "node ids must cover 0..N without gaps")
                    .with_context("expected", expected)
                    .with_context("found", node),
            ));
        }
    }
    AdjacencyStructure::from_rows(rows.into_values().collect())
}

fn parse_id(token: &str, line: usize) -> Result<NodeId, WsError> {
    token.parse::<u64>().map(NodeId::from_raw).map_err(|err| {
        WsError::Serde(
            ErrorInfo::new("parse-adjlist", err.to_string())
                .with_context("token", token)
                .with_context("line", line),
        )
    })
}

/// Serializes the structure to a JSON string.
pub fn graph_to_json(graph: &AdjacencyStructure) -> Result<String, WsError> {
    let serializable = SerializableGraph::from_graph(graph);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| WsError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a structure from a JSON string.
pub fn graph_from_json(json: &str) -> Result<AdjacencyStructure, WsError> {
    let serializable: SerializableGraph = serde_json::from_str(json)
        .map_err(|err| WsError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_graph()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    schema_version: SchemaVersion,
    nodes: usize,
    degree: usize,
    rows: Vec<Vec<u64>>,
}

impl SerializableGraph {
    fn from_graph(graph: &AdjacencyStructure) -> Self {
        Self {
            schema_version: GRAPH_SCHEMA,
            nodes: graph.node_count(),
            degree: graph.degree(),
            rows: graph
                .rows()
                .map(|(_, row)| row.iter().map(NodeId::as_raw).collect())
                .collect(),
        }
    }

    fn into_graph(self) -> Result<AdjacencyStructure, WsError> {
        if self.schema_version.major != GRAPH_SCHEMA.major {
            return Err(WsError::Serde(
                ErrorInfo::new("schema-mismatch", "unsupported graph schema")
                    .with_context("found", self.schema_version.major)
                    .with_context("supported", GRAPH_SCHEMA.major),
            ));
        }
        if self.rows.len() != self.nodes {
            return Err(WsError::Serde(
                ErrorInfo::new("row-count", "row count does not match node count")
                    .with_context("nodes", self.nodes)
                    .with_context("rows", self.rows.len()),
            ));
        }
        let rows: Vec<Vec<NodeId>> = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(NodeId::from_raw).collect())
            .collect();
        let graph = AdjacencyStructure::from_rows(rows)?;
        if graph.node_count() > 0 && graph.degree() != self.degree {
            return Err(WsError::Serde(
                ErrorInfo::new("degree-mismatch", "row length does not match degree")
                    .with_context("degree", self.degree)
                    .with_context("rows", graph.degree()),
            ));
        }
        Ok(graph)
    }
}
