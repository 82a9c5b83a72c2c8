use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::OffsetDateTime;

/// One discovered mod. `folder` is the identity key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModEntry {
    pub name: String,
    pub codename: String,
    pub folder: String,
    pub enabled: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub discovered_at: OffsetDateTime,
}

impl ModEntry {
    /// A freshly discovered mod: enabled, stamped with the current time.
    pub fn discovered(folder: String, codename: String, name: String) -> Self {
        Self {
            name,
            codename,
            folder,
            enabled: true,
            discovered_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Display ordering: names starting with a non-alphanumeric character come
/// first, then case-insensitive alphabetical.
pub fn display_order(a: &ModEntry, b: &ModEntry) -> Ordering {
    let special = |name: &str| {
        name.chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric())
    };

    special(&b.name)
        .cmp(&special(&a.name))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}
