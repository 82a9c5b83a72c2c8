use crate::config::AppConfig;
use crate::core::metadata::{self, ModMeta};
use crate::core::steam::RemoteMetadata;
use crate::models::library::Catalog;
use crate::models::mod_dto::ModEntry;
use crate::utils::file::FileUtils;
use crate::utils::thread::bounded_map;
use std::collections::HashSet;
use tracing::{error, info, warn};

/// Upper bound on concurrent metadata extractions.
pub const EXTRACT_WORKERS: usize = 10;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub retained: usize,
    /// Set when the pass was a no-op; holds the reason.
    pub skipped: Option<String>,
}

/// Merges the folders present under the workshop root into `catalog`.
///
/// Known folders keep their entry untouched, unknown ones are extracted on a
/// bounded pool and appended, entries whose folder vanished are dropped.
/// When the root cannot be listed the catalog is left as it was.
pub fn reconcile(config: &AppConfig, catalog: &mut Catalog, remote: &dyn RemoteMetadata) -> ScanReport {
    let root = &config.workshop_root;
    if root.as_str().is_empty() {
        warn!("scan skipped: workshop_root is empty");
        return skipped("workshop_root is empty");
    }

    let present = match FileUtils::visible_subdirs(root) {
        Ok(folders) => folders,
        Err(e) => {
            error!("scan error for {root}: {e}");
            return skipped(&format!("{root}: {e}"));
        }
    };

    if present.is_empty() && !catalog.mods.is_empty() {
        warn!("scan skipped: {root} has no mod folders, keeping {} known mod(s)", catalog.mods.len());
        return skipped(&format!("{root} has no mod folders"));
    }

    let unknown: Vec<String> = {
        let known = catalog.index_by_folder();
        present
            .iter()
            .filter(|folder| !known.contains_key(folder.as_str()))
            .cloned()
            .collect()
    };

    // Barrier: every extraction finishes before the catalog is touched.
    let mut found: Vec<(String, ModMeta)> = bounded_map(unknown, EXTRACT_WORKERS, |folder| {
        let meta = metadata::extract(&root.join(&folder), remote);
        (folder, meta)
    });
    found.sort_by(|a, b| a.0.cmp(&b.0));

    let present: HashSet<&str> = present.iter().map(String::as_str).collect();
    let mut report = ScanReport::default();
    let mut seen: HashSet<String> = HashSet::new();

    catalog.mods.retain(|m| {
        if !present.contains(m.folder.as_str()) {
            info!("removing missing mod: {}", m.folder);
            report.removed.push(m.folder.clone());
            return false;
        }
        // A hand-edited catalog may list a folder twice; the first entry wins.
        if !seen.insert(m.folder.clone()) {
            warn!("dropping duplicate catalog entry for {}", m.folder);
            return false;
        }
        true
    });
    report.retained = catalog.mods.len();

    for (folder, meta) in found {
        info!("discovered mod {folder} ({})", meta.name);
        report.added.push(folder.clone());
        catalog
            .mods
            .push(ModEntry::discovered(folder, meta.codename, meta.name));
    }

    report
}

fn skipped(reason: &str) -> ScanReport {
    ScanReport {
        skipped: Some(reason.to_string()),
        ..ScanReport::default()
    }
}
