use crate::config::AppConfig;
use crate::core::cover::CoverCache;
use crate::core::launcher::{shutdown_signal, LaunchReport, Supervisor};
use crate::core::relocation::CopyConsent;
use crate::core::scanner;
use crate::core::steam::RemoteMetadata;
use crate::models::error::SError;
use crate::models::library::Catalog;
use crate::models::paths::{CachePaths, StorePaths};
use crate::models::selector::ModSelector;
use crate::utils::process::{ProcessChecker, ProcessProbe};
use camino::Utf8PathBuf;
use tracing::{info, instrument};

/// The operations front ends call. Every operation loads the catalog once,
/// works on it in memory and saves it at the end.
pub struct ModManager<R: RemoteMetadata> {
    pub config: AppConfig,
    pub store: StorePaths,
    pub cache: CachePaths,
    remote: R,
}

impl<R: RemoteMetadata> ModManager<R> {
    pub fn new(config: AppConfig, store: StorePaths, cache: CachePaths, remote: R) -> Self {
        Self {
            config,
            store,
            cache,
            remote,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn load_catalog(&self) -> Result<Catalog, SError> {
        Catalog::load_or_create(&self.store.catalog)
    }

    fn refresh(&self, catalog: &mut Catalog) {
        let report = scanner::reconcile(&self.config, catalog, &self.remote);
        if !report.added.is_empty() || !report.removed.is_empty() {
            info!(
                "catalog updated: {} added, {} removed, {} kept",
                report.added.len(),
                report.removed.len(),
                report.retained
            );
        }
    }

    /// Scans the workshop root, merges the result and persists it.
    #[instrument(skip(self))]
    pub fn scan_and_reconcile(&self) -> Result<Catalog, SError> {
        let mut catalog = self.load_catalog()?;
        self.refresh(&mut catalog);
        catalog.save(&self.store.catalog)?;
        Ok(catalog)
    }

    /// Enables or disables the mods picked by `id` (folder, codename or
    /// `ALL`). Returns how many entries changed state.
    #[instrument(skip(self))]
    pub fn toggle(&self, id: &str, enabled: bool) -> Result<usize, SError> {
        let selector = ModSelector::parse(id)?;

        let mut catalog = self.load_catalog()?;
        self.refresh(&mut catalog);
        let count = selector.apply(&mut catalog, enabled)?;
        catalog.save(&self.store.catalog)?;

        info!("{} {id}", if enabled { "Enabled" } else { "Disabled" });
        Ok(count)
    }

    /// Launches the game with disabled mods parked outside the workshop root
    /// and puts them back once the game exits or the operator interrupts.
    #[instrument(skip(self, consent))]
    pub fn launch_with_mods(&self, consent: &mut dyn CopyConsent) -> Result<LaunchReport, SError> {
        self.launch_with_probe(consent, ProcessChecker::new())
    }

    pub fn launch_with_probe<P: ProcessProbe>(
        &self,
        consent: &mut dyn CopyConsent,
        probe: P,
    ) -> Result<LaunchReport, SError> {
        if self.config.game_exe.as_str().is_empty() {
            return Err(SError::ConfigError("game_exe is empty".into()));
        }

        let mut catalog = self.load_catalog()?;
        self.refresh(&mut catalog);
        catalog.save(&self.store.catalog)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SError::AsyncRuntimeError(e.to_string()))?;

        // Listen for interrupts before anything is moved.
        let interrupt = {
            let _runtime = runtime.enter();
            shutdown_signal()
        };
        let supervisor = Supervisor::new(self.config.clone(), probe);
        let report = runtime.block_on(supervisor.run(&catalog, consent, interrupt))?;

        catalog.save(&self.store.catalog)?;
        Ok(report)
    }

    /// Path of the cached cover image for `folder`, fetched on first use.
    #[instrument(skip(self))]
    pub fn cover(&self, folder: &str) -> Result<Utf8PathBuf, SError> {
        CoverCache::new(self.cache.clone(), self.config.app_id.clone())
            .get_or_download(folder, &self.remote)
    }
}
