use crate::models::error::SError;
use crate::models::library::Catalog;
use crate::utils::toml::Toml;
use camino::Utf8Path;
use tracing::info;

impl Catalog {
    /// `Ok(None)` when no catalog has been written yet.
    pub fn load(path: &Utf8Path) -> Result<Option<Catalog>, SError> {
        if !path.exists() {
            return Ok(None);
        }
        Toml::read(path).map(Some)
    }

    /// Loads the catalog, creating and persisting an empty one on first use.
    pub fn load_or_create(path: &Utf8Path) -> Result<Catalog, SError> {
        match Self::load(path)? {
            Some(catalog) => Ok(catalog),
            None => {
                info!("no catalog at {path}, creating an empty one");
                let catalog = Catalog::default();
                catalog.save(path)?;
                Ok(catalog)
            }
        }
    }

    /// Persists the whole catalog atomically.
    pub fn save(&self, path: &Utf8Path) -> Result<(), SError> {
        Toml::write(path, self)
    }
}
