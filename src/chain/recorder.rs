use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{chain::ChainState, metrics::{RegionIndex, num_region_splits}};

#[derive(Serialize)]
struct Record<'a> {
    step: usize,
    accepted: bool,
    assignment: &'a [u32],
    #[serde(skip_serializing_if = "Option::is_none")]
    region_splits: Option<usize>,
}

/// Writes chain states as JSON lines:
///
/// ```text
/// {"step":0,"accepted":true,"assignment":[1,1,2,2],"region_splits":0}
/// ```
///
/// `assignment` holds the district label of every node in graph order.
pub struct ChainRecorder<W: Write> {
    writer: W,
    regions: Option<RegionIndex>,
    records: usize,
}

impl ChainRecorder<BufWriter<File>> {
    /// Create (or truncate) a JSON-lines file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("[chain::recorder] Failed to create chain file: {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ChainRecorder<W> {
    pub fn new(writer: W) -> Self { Self { writer, regions: None, records: 0 } }

    /// Also record the number of split regions with every state.
    pub fn with_regions(mut self, regions: RegionIndex) -> Self {
        self.regions = Some(regions);
        self
    }

    #[inline] pub fn records(&self) -> usize { self.records }

    pub fn record(&mut self, state: &ChainState) -> Result<()> {
        let districts = state.partition.districts();
        let record = Record {
            step: state.step,
            accepted: state.accepted,
            assignment: &districts,
            region_splits: self.regions.as_ref().map(|regions| num_region_splits(state.partition.assignments(), regions)),
        };

        serde_json::to_writer(&mut self.writer, &record)
            .with_context(|| format!("[chain::recorder] Failed to write step {}", state.step))?;
        self.writer.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().context("[chain::recorder] Failed to flush chain output")?;
        Ok(self.writer)
    }
}
