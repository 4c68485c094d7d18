use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::Result, graph::Graph};

/// An administrative region column paired with the penalty for splitting it.
///
/// Division lists are ordered: earlier entries are preferred to stay whole over later ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub column: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 { 1.0 }

impl Division {
    pub fn new(column: impl Into<String>, weight: f64) -> Self {
        Self { column: column.into(), weight }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.column, self.weight)
    }
}

/// Parses `COLUMN` or `COLUMN:WEIGHT`.
impl FromStr for Division {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (column, weight) = match s.rsplit_once(':') {
            Some((column, weight)) => {
                let weight = weight.trim().parse::<f64>()
                    .map_err(|e| format!("invalid division weight '{weight}': {e}"))?;
                (column.trim(), weight)
            }
            None => (s.trim(), default_weight()),
        };
        if column.is_empty() { return Err(format!("division '{s}' has an empty column name")) }
        if !weight.is_finite() { return Err(format!("division weight must be finite, got {weight}")) }
        Ok(Self::new(column, weight))
    }
}

/// A division whose column has been resolved against a particular graph.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ResolvedDivision<'a> {
    codes: &'a [u32],
    weight: f64,
}

impl ResolvedDivision<'_> {
    /// Check if the edge (u, v) crosses a boundary of this division.
    #[inline] pub(crate) fn crosses(&self, u: usize, v: usize) -> bool { self.codes[u] != self.codes[v] }

    #[inline] pub(crate) fn weight(&self) -> f64 { self.weight }
}

/// Split scores are `u64` bit weights, one bit per ranked division.
pub(crate) const MAX_DIVISIONS: usize = 63;

/// Resolve each division's label column on `graph`, preserving order.
pub(crate) fn resolve<'a>(graph: &'a Graph, divisions: &[Division]) -> Result<Vec<ResolvedDivision<'a>>> {
    divisions.iter()
        .map(|division| Ok(ResolvedDivision {
            codes: graph.labels(&division.column)?.codes(),
            weight: division.weight,
        }))
        .collect()
}

/// Reorder divisions from highest to lowest weight; equal weights keep their given order.
pub(crate) fn by_priority<'a>(divisions: &[ResolvedDivision<'a>]) -> Vec<ResolvedDivision<'a>> {
    let mut sorted = divisions.to_vec();
    sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeAttributes;

    #[test]
    fn parses_column_with_and_without_weight() {
        assert_eq!("county".parse::<Division>().unwrap(), Division::new("county", 1.0));
        assert_eq!("muni:0.5".parse::<Division>().unwrap(), Division::new("muni", 0.5));
        assert!(":2".parse::<Division>().is_err());
        assert!("county:heavy".parse::<Division>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let division = Division::new("county", 4.0);
        assert_eq!(division.to_string().parse::<Division>().unwrap(), division);
    }

    #[test]
    fn weight_defaults_when_deserializing() {
        let division: Division = serde_json::from_str(r#"{"column": "county"}"#).unwrap();
        assert_eq!(division.weight, 1.0);
    }

    #[test]
    fn priority_order_is_stable_and_descending() {
        let graph = Graph::new(
            vec!["a".into(), "b".into()],
            &[vec![1], vec![0]],
            NodeAttributes::new()
                .with_labels("county", ["1", "2"])
                .with_labels("muni", ["x", "x"])
                .with_labels("ward", ["p", "q"]),
        ).unwrap();

        let resolved = resolve(&graph, &[
            Division::new("muni", 1.0),
            Division::new("county", 4.0),
            Division::new("ward", 1.0),
        ]).unwrap();
        let sorted = by_priority(&resolved);

        assert_eq!(sorted.iter().map(|d| d.weight()).collect::<Vec<_>>(), vec![4.0, 1.0, 1.0]);
        assert!(sorted[0].crosses(0, 1)); // county
        assert!(!sorted[1].crosses(0, 1)); // muni
        assert!(sorted[2].crosses(0, 1)); // ward
    }

    #[test]
    fn unknown_column_fails_to_resolve() {
        let graph = Graph::new(vec!["a".into()], &[vec![]], NodeAttributes::new()).unwrap();
        assert!(resolve(&graph, &[Division::new("county", 1.0)]).is_err());
    }
}
