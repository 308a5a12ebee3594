//! Cosine-similarity store for recipe book passages, persisted as one JSON file.
#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

type Float = f32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub entry: Entry,
    pub score: Float,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredIndex {
    embedding_dim: usize,
    model_id: String,
    entries: Vec<Entry>,
    /// Row-major, one normalized row per entry.
    #[serde(with = "base64_floats")]
    matrix: Vec<Float>,
}

mod base64_floats {
    use super::*;
    use bytemuck::cast_slice;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(vec: &[Float], serializer: S) -> Result<S::Ok, S::Error> {
        let bytes: &[u8] = cast_slice(vec);
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Float>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)?;
        if bytes.len() % 4 != 0 {
            return Err(serde::de::Error::custom(format!(
                "matrix byte length {} is not a multiple of 4",
                bytes.len()
            )));
        }
        Ok(bytes
            .chunks_exact(4)
            .map(|c| Float::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct VectorStore {
    index: StoredIndex,
}

impl VectorStore {
    pub fn new(embedding_dim: usize, model_id: impl Into<String>) -> Self {
        Self {
            index: StoredIndex {
                embedding_dim,
                model_id: model_id.into(),
                entries: Vec::new(),
                matrix: Vec::new(),
            },
        }
    }

    /// `Ok(None)` when there is no index file yet (or it is empty).
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() || path.metadata()?.len() == 0 {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read index {}", path.display()))?;
        let index: StoredIndex = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse index {}", path.display()))?;

        let expected_len = index.entries.len() * index.embedding_dim;
        if index.matrix.len() != expected_len {
            anyhow::bail!(
                "Matrix size mismatch: expected {}, got {}",
                expected_len,
                index.matrix.len()
            );
        }
        Ok(Some(Self { index }))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.index)?;
        fs::write(path, json).with_context(|| format!("Failed to write index {}", path.display()))
    }

    pub fn insert(&mut self, entry: Entry, vector: &[Float]) -> Result<()> {
        if vector.len() != self.index.embedding_dim {
            anyhow::bail!(
                "Embedding dimension mismatch: store has {}, got {}",
                self.index.embedding_dim,
                vector.len()
            );
        }
        self.index.matrix.extend(normalize(vector));
        self.index.entries.push(entry);
        Ok(())
    }

    /// The `top_k` entries closest to `query`, best first.
    pub fn query(&self, query: &[Float], top_k: usize) -> Vec<SearchHit> {
        let dim = self.index.embedding_dim;
        if query.len() != dim || dim == 0 || top_k == 0 {
            return Vec::new();
        }
        let query = normalize(query);

        let mut scored: Vec<(usize, Float)> = self
            .index
            .matrix
            .par_chunks(dim)
            .enumerate()
            .map(|(i, row)| (i, row.iter().zip(&query).map(|(a, b)| a * b).sum::<Float>()))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(i, score)| SearchHit {
                entry: self.index.entries[i].clone(),
                score,
            })
            .collect()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.index.entries
    }

    pub fn model_id(&self) -> &str {
        &self.index.model_id
    }

    pub fn embedding_dim(&self) -> usize {
        self.index.embedding_dim
    }

    pub fn len(&self) -> usize {
        self.index.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.entries.is_empty()
    }
}

pub fn normalize(vector: &[Float]) -> Vec<Float> {
    let norm = vector.iter().map(|x| x * x).sum::<Float>().sqrt();
    if norm == 0.0 {
        return vector.to_vec();
    }
    vector.iter().map(|x| x / norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(id: &str) -> Entry {
        Entry {
            id: id.to_string(),
            text: format!("text of {}", id),
        }
    }

    fn sample() -> VectorStore {
        let mut store = VectorStore::new(3, "test-model");
        store.insert(entry("x"), &[1.0, 0.0, 0.0]).unwrap();
        store.insert(entry("y"), &[0.0, 2.0, 0.0]).unwrap();
        store.insert(entry("xy"), &[1.0, 1.0, 0.0]).unwrap();
        store
    }

    #[test]
    fn test_query_orders_by_cosine() {
        let store = sample();
        let hits = store.query(&[0.0, 5.0, 0.0], 2);
        let ids: Vec<&str> = hits.iter().map(|h| h.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["y", "xy"]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_query_with_wrong_dimension_finds_nothing() {
        assert!(sample().query(&[1.0, 0.0], 3).is_empty());
        assert!(sample().query(&[1.0, 0.0, 0.0], 0).is_empty());
    }

    #[test]
    fn test_insert_rejects_wrong_dimension() {
        let mut store = VectorStore::new(3, "m");
        assert!(store.insert(entry("a"), &[1.0]).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("index.json");
        sample().save(&path).unwrap();

        let loaded = VectorStore::load(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.model_id(), "test-model");
        assert_eq!(loaded.embedding_dim(), 3);
        assert_eq!(loaded.query(&[1.0, 0.0, 0.0], 1)[0].entry.id, "x");
    }

    #[test]
    fn test_missing_index_loads_as_none() {
        let dir = tempdir().unwrap();
        assert!(VectorStore::load(&dir.path().join("absent.json")).unwrap().is_none());
    }

    #[test]
    fn test_truncated_matrix_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.json");
        // One float for two 2-d entries.
        let matrix = general_purpose::STANDARD.encode(1.0f32.to_le_bytes());
        let json = serde_json::json!({
            "embedding_dim": 2,
            "model_id": "m",
            "entries": [{"id": "a", "text": "a"}, {"id": "b", "text": "b"}],
            "matrix": matrix,
        });
        fs::write(&path, json.to_string()).unwrap();
        let err = VectorStore::load(&path).unwrap_err();
        assert!(err.to_string().contains("Matrix size mismatch"));
    }

    #[test]
    fn test_normalize_leaves_zero_vector_alone() {
        assert_eq!(normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
        let unit = normalize(&[3.0, 4.0]);
        assert!((unit[0] - 0.6).abs() < 1e-6 && (unit[1] - 0.8).abs() < 1e-6);
    }
}
