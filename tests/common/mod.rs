#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use herbarium_lib::config::{AppConfig, CrossDevicePolicy};
use herbarium_lib::core::relocation::Mover;
use herbarium_lib::core::steam::RemoteMetadata;
use herbarium_lib::models::error::SError;
use herbarium_lib::models::library::Catalog;
use herbarium_lib::models::mod_dto::ModEntry;
use herbarium_lib::utils::process::ProcessProbe;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Temp layout: `<tmp>/workshop` as the root, `<tmp>/disabled` as holding.
pub fn setup_test_env() -> (TempDir, AppConfig) {
    let tmp = tempfile::tempdir().unwrap();
    let base = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();

    let workshop = base.join("workshop");
    fs::create_dir_all(&workshop).unwrap();

    let config = AppConfig {
        game_exe: "/bin/true".into(),
        args: Vec::new(),
        workshop_root: workshop,
        disabled_dir: Some(base.join("disabled")),
        target_process: "herbarium-test-target".into(),
        app_id: "331470".into(),
        cross_device: CrossDevicePolicy::Never,
        poll_interval_ms: 10,
    };

    (tmp, config)
}

pub fn base_dir(tmp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap()
}

/// Creates `<root>/<folder>` with one script declaring the mod and a data file.
pub fn create_test_mod(root: &Utf8Path, folder: &str, codename: &str, title: &str) {
    let scripts = root.join(folder).join("game/scripts");
    fs::create_dir_all(&scripts).unwrap();
    fs::write(
        scripts.join("init.rpy"),
        format!("init python:\n    $ mods[\"{codename}\"] = u\"{title}\"\n"),
    )
    .unwrap();
    fs::write(root.join(folder).join("game/data.bin"), folder.as_bytes()).unwrap();
}

/// Creates a mod folder with no script metadata at all.
pub fn create_bare_mod(root: &Utf8Path, folder: &str) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("readme.txt"), folder).unwrap();
}

pub fn entry(folder: &str, enabled: bool) -> ModEntry {
    let mut m = ModEntry::discovered(folder.into(), folder.into(), folder.into());
    m.enabled = enabled;
    m
}

pub fn catalog(entries: Vec<ModEntry>) -> Catalog {
    Catalog { mods: entries }
}

/// Relative path → file contents for every file below `root`.
pub fn snapshot(root: &Utf8Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_string_lossy().to_string();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

pub fn dir_names(root: &Utf8Path) -> Vec<String> {
    let mut names: Vec<String> = match root.read_dir_utf8() {
        Ok(rd) => rd.map(|e| e.unwrap().file_name().to_string()).collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// Remote stub with canned titles that counts lookups.
#[derive(Default)]
pub struct FakeRemote {
    pub titles: HashMap<String, String>,
    pub covers: HashMap<String, Vec<u8>>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeRemote {
    pub fn with_title(id: &str, title: &str) -> Self {
        let mut remote = Self::default();
        remote.titles.insert(id.into(), title.into());
        remote
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteMetadata for FakeRemote {
    fn fetch_title(&self, id: &str) -> Result<Option<String>, SError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SError::NetworkError("connection refused".into()));
        }
        Ok(self.titles.get(id).cloned())
    }

    fn fetch_cover_url(&self, id: &str) -> Result<Option<String>, SError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.covers.contains_key(id).then(|| format!("mem://{id}")))
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, SError> {
        let id = url.trim_start_matches("mem://");
        self.covers
            .get(id)
            .cloned()
            .ok_or_else(|| SError::NetworkError(format!("404 {url}")))
    }
}

/// Replays a fixed sequence of answers, then repeats the last one.
pub struct ScriptedProbe {
    answers: Vec<bool>,
    last: bool,
}

impl ScriptedProbe {
    pub fn new(answers: &[bool]) -> Self {
        let mut answers = answers.to_vec();
        answers.reverse();
        let last = answers.first().copied().unwrap_or(false);
        Self { answers, last }
    }
}

impl ProcessProbe for ScriptedProbe {
    fn is_running(&mut self, _target: &str) -> bool {
        self.answers.pop().unwrap_or(self.last)
    }
}

/// Acts as if the named folders lived on another device: renaming them
/// fails, so every move has to go through copy + delete. Tree removal can
/// be made to fail too, after it has deleted one file.
#[derive(Default)]
pub struct CrossDeviceMover {
    pub cross_device: Vec<String>,
    pub stuck: Vec<Utf8PathBuf>,
    pub renames: usize,
}

impl CrossDeviceMover {
    pub fn for_folders(folders: &[&str]) -> Self {
        Self {
            cross_device: folders.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl Mover for CrossDeviceMover {
    fn rename(&mut self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        self.renames += 1;
        let name = from.file_name().unwrap_or_default();
        if self.cross_device.iter().any(|f| f == name) {
            return Err(io::Error::new(io::ErrorKind::Other, "Invalid cross-device link (os error 18)"));
        }
        fs::rename(from, to)
    }

    fn remove_tree(&mut self, path: &Utf8Path) -> io::Result<()> {
        if self.stuck.iter().any(|p| p.as_path() == path) {
            let first_file = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .find(|e| e.file_type().is_file());
            if let Some(file) = first_file {
                fs::remove_file(file.path())?;
            }
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "Operation not permitted"));
        }
        fs::remove_dir_all(path)
    }
}
