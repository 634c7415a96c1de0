use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{NetworkError, Result};

/// One row of the node table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeRecord {
    pub organization_id: String,
    pub degree_centrality: f64,
    pub betweenness: f64,
}

/// One row of the edge table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

trait Validate {
    fn validate(&self) -> std::result::Result<(), String>;
}

impl Validate for NodeRecord {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.organization_id.is_empty() {
            return Err("empty organization_id".to_string());
        }
        check_score("degree_centrality", self.degree_centrality)?;
        check_score("betweenness", self.betweenness)
    }
}

impl Validate for EdgeRecord {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.source.is_empty() || self.target.is_empty() {
            return Err("empty edge endpoint".to_string());
        }
        if !self.weight.is_finite() {
            return Err(format!("weight is not finite: {}", self.weight));
        }
        Ok(())
    }
}

fn check_score(column: &str, value: f64) -> std::result::Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{column} must be a non-negative number, got {value}"));
    }
    Ok(())
}

pub fn read_nodes(path: impl AsRef<Path>) -> Result<Vec<NodeRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| NetworkError::io(path, e))?;
    nodes_from_reader(file)
}

pub fn read_edges(path: impl AsRef<Path>) -> Result<Vec<EdgeRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| NetworkError::io(path, e))?;
    edges_from_reader(file)
}

pub fn nodes_from_reader<R: Read>(reader: R) -> Result<Vec<NodeRecord>> {
    read_table("nodes", reader)
}

pub fn edges_from_reader<R: Read>(reader: R) -> Result<Vec<EdgeRecord>> {
    read_table("edges", reader)
}

fn read_table<T, R>(table: &'static str, reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned + Validate,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, result) in reader.deserialize::<T>().enumerate() {
        let record = i + 1;
        let row = match result {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                return Err(NetworkError::InputSchema {
                    table,
                    record,
                    reason: err.to_string(),
                })
            }
        };
        row.validate()
            .map_err(|reason| NetworkError::InputSchema {
                table,
                record,
                reason,
            })?;
        rows.push(row);
    }

    log::debug!("read {} {} records", rows.len(), table);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_nodes_from_reader() {
        let data = "organization_id,degree_centrality,betweenness\n\
                    A, 0.9, 0.2\n\
                    B,0.5,0.0\n";
        let nodes = nodes_from_reader(data.as_bytes()).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].organization_id, "A");
        assert_eq!(nodes[0].degree_centrality, 0.9);
        assert_eq!(nodes[1].betweenness, 0.0);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let data = "organization_id,degree_centrality\nA,0.9\n";
        let err = nodes_from_reader(data.as_bytes()).unwrap_err();
        match err {
            NetworkError::InputSchema { table, record, .. } => {
                assert_eq!(table, "nodes");
                assert_eq!(record, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_attribute_is_schema_error() {
        let data = "source,target,weight\nA,B,1\nB,C,heavy\n";
        let err = edges_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::InputSchema {
                table: "edges",
                record: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_centrality_rejected() {
        let data = "organization_id,degree_centrality,betweenness\nA,-0.1,0.2\n";
        let err = nodes_from_reader(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("degree_centrality"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let data = "source,target,weight\n,B,1\n";
        assert!(edges_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_read_edges_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "source,target,weight").unwrap();
        writeln!(file, "A,B,2.5").unwrap();
        writeln!(file, "B,C,1").unwrap();

        let edges = read_edges(file.path()).unwrap();
        assert_eq!(
            edges[0],
            EdgeRecord {
                source: "A".to_string(),
                target: "B".to_string(),
                weight: 2.5,
            }
        );
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_nodes(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, NetworkError::Io { .. }));
    }
}
