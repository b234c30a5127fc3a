//! Generic binary/JSON persistence helpers, shared by every snapshot
//! type that wants a `save`/`load` pair without rewriting the
//! boilerplate each time.

pub mod bin;
pub mod json;

use std::path::PathBuf;

/// Types that can be saved under `./data/<folder>/<name>.<ext>`.
/// Implemented by [`crate::simulation::io::SimulationState`]; any
/// future snapshot type (e.g. a standalone ensemble record) plugs into
/// the same `save_file`/`load_file` pair by implementing this.
pub trait DataPersistence: serde::Serialize + for<'de> serde::Deserialize<'de> {
    /// Subdirectory under `./data/` this type's files live in.
    fn folder() -> &'static str;
    /// File stem, without extension.
    fn name(&self) -> String;

    fn binary_path(&self) -> PathBuf {
        PathBuf::from("./data").join(Self::folder()).join(format!("{}.bin", self.name()))
    }

    fn json_path(&self) -> PathBuf {
        PathBuf::from("./data").join(Self::folder()).join(format!("{}.json", self.name()))
    }
}

/// Ensures `./data/<folder>` exists for every registered persistence
/// kind. Called once at startup by the CLI before any save.
pub fn ensure_data_directories(folders: &[&str]) -> std::io::Result<()> {
    for folder in folders {
        std::fs::create_dir_all(std::path::Path::new("./data").join(folder))?;
    }
    Ok(())
}
