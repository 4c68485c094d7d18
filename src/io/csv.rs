use std::{fs::File, path::Path};

use anyhow::{Context, Result, ensure};
use polars::{frame::DataFrame, io::{SerReader, SerWriter}, prelude::{CsvReadOptions, CsvWriter, NamedFrom}, series::Series};

use crate::{graph::Graph, partition::Partition};

/// Read a `geo_id,district` plan for `graph`, returning the district of every node.
///
/// All columns are read as strings so geo ids keep their leading zeros. Every node must
/// appear exactly once.
pub fn read_plan_csv(path: &Path, graph: &Graph) -> Result<Vec<u32>> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open plan file: {}", path.display()))?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read plan CSV from {:?}", path))?;

    read_plan_assignments(&df, graph)
}

fn read_plan_assignments(df: &DataFrame, graph: &Graph) -> Result<Vec<u32>> {
    ensure!(df.width() >= 2, "[io::csv::read] CSV must have two columns: geo_id,district");
    ensure!(df.height() == graph.node_count(), "[io::csv::read] CSV has {} rows, expected {}", df.height(), graph.node_count());

    let geo_ids = df.column(df.get_column_names()[0])?;
    let districts = df.column(df.get_column_names()[1])?;

    let mut assignment = vec![None; graph.node_count()];
    for (geo_id, district) in geo_ids.str()?.into_iter().zip(districts.str()?.into_iter()) {
        let (Some(geo_id), Some(district)) = (geo_id, district) else {
            anyhow::bail!("[io::csv::read] CSV contains an empty geo_id or district");
        };
        let node = graph.index_of(geo_id)
            .with_context(|| format!("[io::csv::read] GeoId {geo_id} in CSV not found in graph"))?;
        let district = district.trim().parse::<u32>()
            .with_context(|| format!("[io::csv::read] Invalid district '{district}' for {geo_id}"))?;
        ensure!(assignment[node].replace(district).is_none(), "[io::csv::read] GeoId {geo_id} appears more than once");
    }

    // Row count matches and ids are unique, so every node is assigned.
    Ok(assignment.into_iter().flatten().collect())
}

/// Write the district label of every node of `partition` as `geo_id,district`.
pub fn write_plan_csv(path: &Path, partition: &Partition) -> Result<()> {
    let geo_ids = partition.graph().node_ids().to_vec();
    let districts = partition.districts();

    let mut df = DataFrame::new(vec![
        Series::new("geo_id".into(), geo_ids).into(),
        Series::new("district".into(), districts).into(),
    ])?;

    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::graph::NodeAttributes;

    fn make_test_graph() -> Graph {
        Graph::new(
            vec!["01001".into(), "01003".into(), "01005".into()],
            &[vec![1], vec![0, 2], vec![1]],
            NodeAttributes::new(),
        ).unwrap()
    }

    #[test]
    fn plan_survives_a_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        let partition = Partition::new(make_test_graph(), &[7, 7, 3]).unwrap();

        write_plan_csv(&path, &partition).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "geo_id,district\n01001,7\n01003,7\n01005,3\n");
        assert_eq!(read_plan_csv(&path, partition.graph()).unwrap(), vec![7, 7, 3]);
    }

    #[test]
    fn reads_rows_in_any_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        fs::write(&path, "GEOID,District\n01005,2\n01001,1\n01003,1\n").unwrap();

        assert_eq!(read_plan_csv(&path, &make_test_graph()).unwrap(), vec![1, 1, 2]);
    }

    #[test]
    fn rejects_incomplete_or_unknown_rows() {
        let dir = tempfile::tempdir().unwrap();
        let graph = make_test_graph();
        let cases = [
            "geo_id,district\n01001,1\n01003,1\n",
            "geo_id,district\n01001,1\n01003,1\n99999,2\n",
            "geo_id,district\n01001,1\n01001,1\n01005,2\n",
            "geo_id,district\n01001,1\n01003,x\n01005,2\n",
        ];
        for (i, text) in cases.iter().enumerate() {
            let path = dir.path().join(format!("bad{i}.csv"));
            fs::write(&path, text).unwrap();
            assert!(read_plan_csv(&path, &graph).is_err(), "accepted case {i}");
        }
    }
}
