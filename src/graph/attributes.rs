use std::sync::Arc;

use ahash::AHashMap;

/// A categorical node column (county, municipality, ...) stored as interned codes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelColumn {
    codes: Vec<u32>,          // codes[node] indexes into `values`
    values: Arc<[String]>,    // distinct labels in first-seen order
}

impl LabelColumn {
    /// Intern a sequence of per-node labels.
    pub fn from_values<I, S>(labels: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> {
        let mut lookup = AHashMap::<String, u32>::new();
        let mut values = Vec::new();
        let codes = labels.into_iter()
            .map(|label| {
                let label = label.as_ref();
                *lookup.entry(label.to_string()).or_insert_with(|| {
                    values.push(label.to_string());
                    (values.len() - 1) as u32
                })
            })
            .collect();

        Self { codes, values: values.into() }
    }

    /// Number of nodes covered by this column.
    #[inline] pub fn len(&self) -> usize { self.codes.len() }

    /// Check if the column covers no nodes.
    #[inline] pub fn is_empty(&self) -> bool { self.codes.is_empty() }

    /// Number of distinct labels.
    #[inline] pub fn num_labels(&self) -> usize { self.values.len() }

    /// Interned code of a node's label.
    #[inline] pub fn code(&self, node: usize) -> u32 { self.codes[node] }

    /// All codes, indexed by node.
    #[inline] pub fn codes(&self) -> &[u32] { &self.codes }

    /// Label string of a node.
    #[inline] pub fn value(&self, node: usize) -> &str { &self.values[self.codes[node] as usize] }

    /// Label string for an interned code.
    #[inline] pub fn label(&self, code: u32) -> &str { &self.values[code as usize] }

    /// Restrict the column to `nodes`, keeping the same label table.
    pub(crate) fn select(&self, nodes: &[usize]) -> Self {
        Self {
            codes: nodes.iter().map(|&u| self.codes[u]).collect(),
            values: Arc::clone(&self.values),
        }
    }
}

/// Per-node data carried by a [`Graph`](super::Graph).
#[derive(Clone, Debug, Default)]
pub struct NodeAttributes {
    series: AHashMap<String, Vec<f64>>,
    labels: AHashMap<String, LabelColumn>,
}

impl NodeAttributes {
    /// Create an empty attribute set.
    pub fn new() -> Self { Self::default() }

    /// Add (or replace) a numeric series.
    pub fn with_series(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.insert_series(name, values);
        self
    }

    /// Add (or replace) a label column.
    pub fn with_labels<I, S>(mut self, name: impl Into<String>, labels: I) -> Self
    where I: IntoIterator<Item = S>, S: AsRef<str> {
        self.insert_labels(name, LabelColumn::from_values(labels));
        self
    }

    /// Add (or replace) a numeric series.
    pub fn insert_series(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Add (or replace) a label column.
    pub fn insert_labels(&mut self, name: impl Into<String>, column: LabelColumn) {
        self.labels.insert(name.into(), column);
    }

    /// Get a numeric series by name.
    #[inline] pub fn series(&self, name: &str) -> Option<&[f64]> { self.series.get(name).map(Vec::as_slice) }

    /// Get a label column by name.
    #[inline] pub fn labels(&self, name: &str) -> Option<&LabelColumn> { self.labels.get(name) }

    /// Names of all numeric series.
    pub fn series_names(&self) -> impl Iterator<Item = &str> { self.series.keys().map(String::as_str) }

    /// Names of all label columns.
    pub fn label_names(&self) -> impl Iterator<Item = &str> { self.labels.keys().map(String::as_str) }

    /// Name and length of the first column whose length differs from `len`.
    pub(super) fn mismatched_column(&self, len: usize) -> Option<(&str, usize)> {
        self.series.iter().map(|(name, v)| (name.as_str(), v.len()))
            .chain(self.labels.iter().map(|(name, c)| (name.as_str(), c.len())))
            .find(|&(_, n)| n != len)
    }

    /// Restrict every column to `nodes`.
    pub(super) fn select(&self, nodes: &[usize]) -> Self {
        Self {
            series: self.series.iter()
                .map(|(name, values)| (name.clone(), nodes.iter().map(|&u| values[u]).collect()))
                .collect(),
            labels: self.labels.iter()
                .map(|(name, column)| (name.clone(), column.select(nodes)))
                .collect(),
        }
    }
}
