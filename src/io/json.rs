use std::{collections::BTreeSet, fs, path::Path};

use ahash::AHashMap;
use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::graph::{Graph, LabelColumn, NodeAttributes};

/// NetworkX `json_graph` output. Either `adjacency` (adjacency_data) or `links` (node_link_data).
#[derive(Deserialize)]
struct JsonGraph {
    nodes: Vec<Map<String, Value>>,
    #[serde(default)]
    adjacency: Option<Vec<Vec<JsonNeighbor>>>,
    #[serde(default)]
    links: Option<Vec<JsonLink>>,
}

#[derive(Deserialize)]
struct JsonNeighbor {
    id: Value,
}

#[derive(Deserialize)]
struct JsonLink {
    source: Value,
    target: Value,
}

/// Read a dual graph from a NetworkX JSON file.
///
/// Numeric node attributes become series and string attributes become label columns.
/// Columns listed in `label_columns` are always read as labels (so that e.g. numeric FIPS
/// codes can be used as divisions). Attributes that are neither, or that are missing on
/// some nodes, are ignored.
///
/// Node ids (used to key plan files) come from the `id_column` attribute, e.g. `GEOID20`,
/// or from the NetworkX `id` when no column is given.
pub fn read_graph_json(path: &Path, label_columns: &[&str], id_column: Option<&str>) -> Result<Graph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("[io::json::read] Failed to open graph file: {}", path.display()))?;
    parse_graph_json(&text, label_columns, id_column)
        .with_context(|| format!("[io::json::read] Failed to read graph from {:?}", path))
}

/// Parse a dual graph from NetworkX JSON text. See [`read_graph_json`].
pub fn parse_graph_json(text: &str, label_columns: &[&str], id_column: Option<&str>) -> Result<Graph> {
    let json: JsonGraph = serde_json::from_str(text).context("[io::json::read] Malformed graph JSON")?;

    let keys = node_values(&json.nodes, "id")?;
    let node_ids = match id_column {
        Some(column) => node_values(&json.nodes, column)?,
        None => keys.clone(),
    };

    // Edges always refer to nodes by their NetworkX id.
    let index = keys.iter().enumerate()
        .map(|(i, key)| (key.as_str(), i as u32))
        .collect::<AHashMap<_, _>>();
    ensure!(index.len() == keys.len(), "[io::json::read] Graph has duplicate node ids");
    let lookup = |id: &Value| -> Result<u32> {
        let id = id_string(id)?;
        index.get(id.as_str()).copied()
            .with_context(|| format!("[io::json::read] Edge refers to unknown node '{id}'"))
    };

    let mut adjacency = vec![Vec::new(); node_ids.len()];
    match (&json.adjacency, &json.links) {
        (Some(rows), _) => {
            ensure!(rows.len() == node_ids.len(),
                "[io::json::read] Adjacency has {} rows, expected {}", rows.len(), node_ids.len());
            for (u, row) in rows.iter().enumerate() {
                for neighbor in row {
                    adjacency[u].push(lookup(&neighbor.id)?);
                }
            }
        }
        (None, Some(links)) => {
            for link in links {
                let (u, v) = (lookup(&link.source)?, lookup(&link.target)?);
                adjacency[u as usize].push(v);
                adjacency[v as usize].push(u);
            }
        }
        (None, None) => bail!("[io::json::read] Graph JSON has neither 'adjacency' nor 'links'"),
    }

    let attributes = node_attributes(&json.nodes, label_columns);
    Ok(Graph::new(node_ids, &adjacency, attributes)?)
}

/// The `column` value of every node as an id string.
fn node_values(nodes: &[Map<String, Value>], column: &str) -> Result<Vec<String>> {
    nodes.iter().enumerate()
        .map(|(i, node)| match node.get(column) {
            Some(value) => id_string(value),
            None => bail!("[io::json::read] Node {i} has no '{column}'"),
        })
        .collect()
}

/// Node ids may be strings or numbers; numbers are keyed by their JSON text.
fn id_string(id: &Value) -> Result<String> {
    match id {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => bail!("[io::json::read] Unsupported node id {other}"),
    }
}

fn node_attributes(nodes: &[Map<String, Value>], label_columns: &[&str]) -> NodeAttributes {
    let keys = nodes.iter()
        .flat_map(|node| node.keys().map(String::as_str))
        .filter(|&key| key != "id")
        .collect::<BTreeSet<_>>();

    let mut attributes = NodeAttributes::new();
    for key in keys {
        let values = nodes.iter().map(|node| node.get(key)).collect::<Option<Vec<_>>>();
        let Some(values) = values else { continue };

        if label_columns.contains(&key) {
            let labels = values.iter().map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
            attributes.insert_labels(key, LabelColumn::from_values(labels));
        } else if let Some(series) = values.iter().map(|value| value.as_f64()).collect::<Option<Vec<_>>>() {
            attributes.insert_series(key, series);
        } else if let Some(labels) = values.iter().map(|value| value.as_str()).collect::<Option<Vec<_>>>() {
            attributes.insert_labels(key, LabelColumn::from_values(labels));
        }
    }
    attributes
}
