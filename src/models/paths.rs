use camino::{Utf8Path, Utf8PathBuf};

macro_rules! define_paths {
    ($name:ident { $($field:ident : $default:expr),* $(,)? }) => {
        #[derive(Clone, Debug)]
        pub struct $name {
            $(pub $field: Utf8PathBuf,)*
        }

        impl $name {
            pub fn to_absolute(mut self, base: &Utf8Path) -> Self {
                $(self.$field = base.join(self.$field);)*
                self
            }

            pub fn new(base: &Utf8Path) -> Self {
                Self::default().to_absolute(base)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default.into(),)*
                }
            }
        }
    };
}

// Relative to the application's data directory.
define_paths!(StorePaths {
    catalog: "mods_db.toml",
    logs: "logs",
});

// Relative to the user's cache directory.
define_paths!(CachePaths {
    covers: "covers",
});

impl CachePaths {
    /// `<covers>/<app_id>/<folder>/cover`
    pub fn cover_file(&self, app_id: &str, folder: &str) -> Utf8PathBuf {
        self.covers.join(app_id).join(folder).join("cover")
    }
}
