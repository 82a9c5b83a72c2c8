use crate::models::mod_dto::{display_order, ModEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The persisted, ordered collection of known mods.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub mods: Vec<ModEntry>,
}

impl Catalog {
    pub fn index_by_folder(&self) -> HashMap<&str, &ModEntry> {
        self.mods.iter().map(|m| (m.folder.as_str(), m)).collect()
    }

    pub fn get(&self, folder: &str) -> Option<&ModEntry> {
        self.mods.iter().find(|m| m.folder == folder)
    }

    pub fn disabled(&self) -> impl Iterator<Item = &ModEntry> {
        self.mods.iter().filter(|m| !m.enabled)
    }

    /// Entries in display order; the stored order is left untouched.
    pub fn sorted_for_display(&self) -> Vec<&ModEntry> {
        let mut mods: Vec<&ModEntry> = self.mods.iter().collect();
        mods.sort_by(|a, b| display_order(a, b));
        mods
    }
}
