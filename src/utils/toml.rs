use crate::models::error::SError;
use camino::Utf8Path;

pub struct Toml;

impl Toml {
    /// Serializes to a sibling temp file and renames it over `path`, so a
    /// reader never observes a half-written document.
    pub fn write<T: serde::Serialize>(path: &Utf8Path, data: &T) -> Result<(), SError> {
        let text = toml::to_string(data)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            SError::IOError(format!("{path}: {e}"))
        })
    }

    pub fn read<T: serde::de::DeserializeOwned>(path: &Utf8Path) -> Result<T, SError> {
        let s = std::fs::read_to_string(path).map_err(|e| SError::IOError(format!("{path}: {e}")))?;
        Ok(toml::from_str::<T>(&s)?)
    }
}
