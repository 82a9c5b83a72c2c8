use crate::models::error::SError;
use crate::models::library::Catalog;

pub const ALL_SENTINEL: &str = "ALL";

/// Which catalog entries a toggle applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModSelector {
    All,
    /// Matched against `folder` first, then against `codename`.
    Id(String),
}

impl ModSelector {
    pub fn parse(raw: &str) -> Result<Self, SError> {
        match raw.trim() {
            "" => Err(SError::InvalidSelector),
            ALL_SENTINEL => Ok(ModSelector::All),
            id => Ok(ModSelector::Id(id.to_string())),
        }
    }

    /// Resolves the selector to catalog indices.
    pub fn resolve(&self, catalog: &Catalog) -> Result<Vec<usize>, SError> {
        match self {
            ModSelector::All => Ok((0..catalog.mods.len()).collect()),
            ModSelector::Id(id) => catalog
                .mods
                .iter()
                .position(|m| m.folder == *id)
                .or_else(|| catalog.mods.iter().position(|m| m.codename == *id))
                .map(|idx| vec![idx])
                .ok_or_else(|| SError::ModNotFound(id.clone())),
        }
    }

    /// Sets `enabled` on every selected entry and returns how many matched.
    pub fn apply(&self, catalog: &mut Catalog, enabled: bool) -> Result<usize, SError> {
        let indices = self.resolve(catalog)?;
        for &idx in &indices {
            catalog.mods[idx].enabled = enabled;
        }
        Ok(indices.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mod_dto::ModEntry;

    fn catalog() -> Catalog {
        Catalog {
            mods: vec![
                ModEntry::discovered("100".into(), "alpha".into(), "Alpha".into()),
                ModEntry::discovered("200".into(), "100".into(), "Shadow".into()),
            ],
        }
    }

    #[test]
    fn parse_rejects_blank() {
        assert_eq!(ModSelector::parse("  "), Err(SError::InvalidSelector));
        assert_eq!(ModSelector::parse("ALL"), Ok(ModSelector::All));
    }

    #[test]
    fn folder_match_wins_over_codename() {
        let cat = catalog();
        let idx = ModSelector::Id("100".into()).resolve(&cat).unwrap();
        assert_eq!(idx, vec![0]);
    }

    #[test]
    fn codename_match_is_fallback() {
        let mut cat = catalog();
        let n = ModSelector::Id("alpha".into()).apply(&mut cat, false).unwrap();
        assert_eq!(n, 1);
        assert!(!cat.mods[0].enabled);
        assert!(cat.mods[1].enabled);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut cat = catalog();
        let err = ModSelector::Id("nope".into()).apply(&mut cat, false).unwrap_err();
        assert_eq!(err, SError::ModNotFound("nope".into()));
    }

    #[test]
    fn all_touches_every_entry() {
        let mut cat = catalog();
        assert_eq!(ModSelector::All.apply(&mut cat, false).unwrap(), 2);
        assert!(cat.mods.iter().all(|m| !m.enabled));
    }
}
