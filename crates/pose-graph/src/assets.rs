use crate::GraphError;
use std::collections::BTreeMap;
use std::path::Path;

/// Model files the pose graph loads by name.
pub const DEFAULT_ASSETS: [&str; 2] = ["pose_detection.bytes", "pose_landmark_full.bytes"];

/// Named, byte-opaque model assets, read once at startup.
#[derive(Clone, Default, PartialEq)]
pub struct ModelAssets {
    assets: BTreeMap<String, Vec<u8>>,
}

impl std::fmt::Debug for ModelAssets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.assets.iter().map(|(name, bytes)| (name, bytes.len())))
            .finish()
    }
}

impl ModelAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(name.into(), bytes);
    }

    /// Read every file in `names` from `dir`.
    pub async fn load<S: AsRef<str>>(
        dir: impl AsRef<Path>,
        names: &[S],
    ) -> Result<Self, GraphError> {
        let dir = dir.as_ref();
        let mut assets = Self::new();
        for name in names {
            let name = name.as_ref();
            let path = dir.join(name);
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| GraphError::Asset(format!("{}: {}", path.display(), e)))?;
            if bytes.is_empty() {
                return Err(GraphError::Asset(format!("{} is empty", path.display())));
            }
            log::debug!("loaded asset {} ({} bytes)", name, bytes.len());
            assets.insert(name, bytes);
        }
        Ok(assets)
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.assets.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
