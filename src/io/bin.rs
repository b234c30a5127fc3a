//! `bincode` round-trip for any [`super::DataPersistence`] type.

use super::DataPersistence;
use crate::error::SimResult;
use std::path::Path;

pub fn save_file<T: DataPersistence>(data: &T) -> SimResult<()> {
    let file_path = data.binary_path();
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = bincode::serialize(data)?;
    std::fs::write(&file_path, bytes)?;
    Ok(())
}

pub fn load_file<T: DataPersistence>(file_path: &Path) -> SimResult<T> {
    let bytes = std::fs::read(file_path)?;
    let data = bincode::deserialize(&bytes)?;
    Ok(data)
}

pub fn list_files<T: DataPersistence>() -> SimResult<Vec<std::path::PathBuf>> {
    let dir_path = Path::new("./data").join(T::folder());
    if !dir_path.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir_path)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("bin") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
