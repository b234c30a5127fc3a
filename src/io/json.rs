//! Human-readable `serde_json` round-trip for any [`super::DataPersistence`]
//! type. Slower and larger than [`super::bin`], useful for inspecting
//! a snapshot by hand or diffing two runs.

use super::DataPersistence;
use crate::error::SimResult;
use std::path::Path;

pub fn save_file<T: DataPersistence>(data: &T) -> SimResult<()> {
    let file_path = data.json_path();
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(data)?;
    std::fs::write(&file_path, text)?;
    Ok(())
}

pub fn load_file<T: DataPersistence>(file_path: &Path) -> SimResult<T> {
    let text = std::fs::read_to_string(file_path)?;
    let data = serde_json::from_str(&text)?;
    Ok(data)
}
