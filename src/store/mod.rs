//! Keyed persistence for feature matrices and label arrays.
//!
//! The experiment driver only needs `save(array, key)` / `load(key)`;
//! the storage format is up to the implementation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::data::Dataset;
use crate::error::{Result, SketchError};
use crate::primitives::Matrix;

/// Save/load of arrays by string key.
pub trait ArrayStore {
    /// Stores a feature matrix under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn save_matrix(&self, key: &str, matrix: &Matrix<f32>) -> Result<()>;

    /// Loads the feature matrix stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or the data is corrupt.
    fn load_matrix(&self, key: &str) -> Result<Matrix<f32>>;

    /// Stores a label array under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn save_labels(&self, key: &str, labels: &[usize]) -> Result<()>;

    /// Loads the label array stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or the data is corrupt.
    fn load_labels(&self, key: &str) -> Result<Vec<usize>>;

    /// Stores a dataset as `{prefix}/x` and `{prefix}/y`.
    ///
    /// # Errors
    ///
    /// Returns an error if either array cannot be written.
    fn save_dataset(&self, prefix: &str, dataset: &Dataset) -> Result<()> {
        self.save_matrix(&format!("{prefix}/x"), dataset.features())?;
        self.save_labels(&format!("{prefix}/y"), dataset.labels())
    }

    /// Loads a dataset written by [`ArrayStore::save_dataset`].
    ///
    /// # Errors
    ///
    /// Returns an error if either array is missing or they disagree in length.
    fn load_dataset(&self, prefix: &str) -> Result<Dataset> {
        let x = self.load_matrix(&format!("{prefix}/x"))?;
        let y = self.load_labels(&format!("{prefix}/y"))?;
        Dataset::new(x, y)
    }
}

/// JSON files under a root directory, one file per key (`<root>/<key>.json`).
///
/// # Examples
///
/// ```
/// use sketchtron::prelude::*;
///
/// let dir = std::env::temp_dir().join("sketchtron-doc-store");
/// let store = DirStore::new(&dir);
/// store.save_labels("200/y_train_km", &[0, 1, 1]).expect("writable temp dir");
/// assert_eq!(store.load_labels("200/y_train_km").expect("just written"), vec![0, 1, 1]);
/// # std::fs::remove_dir_all(&dir).ok();
/// ```
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Creates a store rooted at `root`. Directories are created on write.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(SketchError::invalid_hyperparameter(
                "key",
                key,
                "non-empty '/'-separated segments without '..'",
            ));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    fn write<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(value)?;
        fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), "saved array");
        Ok(())
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<T> {
        let path = self.path_for(key)?;
        let bytes = fs::read(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ArrayStore for DirStore {
    fn save_matrix(&self, key: &str, matrix: &Matrix<f32>) -> Result<()> {
        self.write(key, matrix)
    }

    fn load_matrix(&self, key: &str) -> Result<Matrix<f32>> {
        let m: Matrix<f32> = self.read(key)?;
        // re-validate, the file may have been edited by hand
        let (rows, cols) = m.shape();
        Matrix::from_vec(rows, cols, m.as_slice().to_vec())
    }

    fn save_labels(&self, key: &str, labels: &[usize]) -> Result<()> {
        self.write(key, labels)
    }

    fn load_labels(&self, key: &str) -> Result<Vec<usize>> {
        self.read(key)
    }
}

#[derive(Debug, Clone)]
enum Stored {
    Matrix(Matrix<f32>),
    Labels(Vec<usize>),
}

/// In-process store, mainly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Stored>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn get(&self, key: &str) -> Result<Stored> {
        let entries = self
            .entries
            .read()
            .map_err(|_| SketchError::Other("memory store lock poisoned".to_string()))?;
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| SketchError::Other(format!("no array stored under key '{key}'")))
    }

    fn put(&self, key: &str, value: Stored) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| SketchError::Other("memory store lock poisoned".to_string()))?
            .insert(key.to_string(), value);
        Ok(())
    }
}

impl ArrayStore for MemoryStore {
    fn save_matrix(&self, key: &str, matrix: &Matrix<f32>) -> Result<()> {
        self.put(key, Stored::Matrix(matrix.clone()))
    }

    fn load_matrix(&self, key: &str) -> Result<Matrix<f32>> {
        match self.get(key)? {
            Stored::Matrix(m) => Ok(m),
            Stored::Labels(_) => Err(SketchError::Serialization(format!(
                "key '{key}' holds labels, not a matrix"
            ))),
        }
    }

    fn save_labels(&self, key: &str, labels: &[usize]) -> Result<()> {
        self.put(key, Stored::Labels(labels.to_vec()))
    }

    fn load_labels(&self, key: &str) -> Result<Vec<usize>> {
        match self.get(key)? {
            Stored::Labels(l) => Ok(l),
            Stored::Matrix(_) => Err(SketchError::Serialization(format!(
                "key '{key}' holds a matrix, not labels"
            ))),
        }
    }
}
