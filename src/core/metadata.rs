use crate::core::steam::RemoteMetadata;
use camino::Utf8Path;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const SCRIPT_EXTENSIONS: &[&str] = &["rpy"];

/// Identity of a mod as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModMeta {
    pub codename: String,
    pub name: String,
}

fn declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^\s*\$?\s*mods\s*\[\s*["']([^"'\]]+)["']\s*\]\s*=\s*u?(?:"((?:\\.|[^"\\])*)"|'((?:\\.|[^'\\])*)')"#,
        )
        .expect("static regex")
    })
}

fn markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^}]*\}").expect("static regex"))
}

/// Determines codename and display name for the mod in `folder`. Never
/// fails: local scripts first, then `remote`, then the folder's own name.
pub fn extract(folder: &Utf8Path, remote: &dyn RemoteMetadata) -> ModMeta {
    debug!("Extracting from folder: {folder}");
    let (mut codename, mut name) = scan_scripts(folder);
    let id = folder.file_name().unwrap_or(folder.as_str());

    if codename.is_none() || name.is_none() {
        match remote.fetch_title(id) {
            Ok(Some(title)) => {
                info!("Remote title found for {id}");
                codename.get_or_insert_with(|| id.to_string());
                name.get_or_insert(title);
            }
            Ok(None) => debug!("No remote title for {id}, using folder name"),
            Err(e) => warn!("Remote lookup failed for {id}, using folder name: {e}"),
        }
    }

    ModMeta {
        codename: codename.unwrap_or_else(|| id.to_string()),
        name: name.unwrap_or_else(|| id.to_string()),
    }
}

/// Walks script files until both fields are known. The first non-empty
/// value found wins for each field.
fn scan_scripts(folder: &Utf8Path) -> (Option<String>, Option<String>) {
    let mut codename = None;
    let mut name = None;

    let scripts = WalkDir::new(folder)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_script(e.path()));

    for entry in scripts {
        if let Some((key, value)) = parse_script(entry.path()) {
            if codename.is_none() && !key.is_empty() {
                codename = Some(key);
            }
            if name.is_none() && !value.is_empty() {
                name = Some(value);
            }
        }
        if codename.is_some() && name.is_some() {
            break;
        }
    }

    (codename, name)
}

fn is_script(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

fn parse_script(path: &std::path::Path) -> Option<(String, String)> {
    let mut reader = BufReader::new(File::open(path).ok()?);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(found) = parse_declaration(&line) {
            return Some(found);
        }
    }
}

/// Matches `$ mods["key"] = u"Value"` and returns the key and cleaned value.
pub fn parse_declaration(line: &str) -> Option<(String, String)> {
    let caps = declaration_re().captures(line)?;
    let value = caps.get(2).or_else(|| caps.get(3))?;
    Some((caps[1].to_string(), clean_title(value.as_str())))
}

/// Strips `{tag}` markup, unescapes quotes and collapses whitespace.
pub fn clean_title(raw: &str) -> String {
    let stripped = markup_re().replace_all(raw.trim(), "");
    let unescaped = stripped.replace("\\\"", "\"").replace("\\'", "'");
    unescaped
        .trim_matches('"')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
