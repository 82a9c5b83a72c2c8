use crate::models::error::SError;
use camino::Utf8Path;
use std::io;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

pub struct FileUtils;

impl FileUtils {
    /// Recursively copies a directory tree from source to destination.
    /// Creates all necessary directories and overwrites existing files.
    /// Symlinks are recreated, not followed.
    pub fn copy_recursive(src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
        Self::copy_tree(src.as_std_path(), dst.as_std_path(), true)
    }

    /// Copies `src` to `dst` and then deletes `src`.
    ///
    /// A failed copy removes whatever part of `dst` was written. A failed
    /// delete puts back anything it already took from `src` and drops the
    /// copy, so either way the tree ends up in exactly one place.
    pub fn copy_then_remove(src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
        Self::copy_then_remove_with(src, dst, &mut |path: &Utf8Path| std::fs::remove_dir_all(path))
    }

    /// [`FileUtils::copy_then_remove`] with the tree removal supplied by
    /// the caller.
    pub fn copy_then_remove_with(
        src: &Utf8Path,
        dst: &Utf8Path,
        remove: &mut dyn FnMut(&Utf8Path) -> io::Result<()>,
    ) -> Result<(), SError> {
        if let Err(e) = Self::copy_recursive(src, dst) {
            let _ = std::fs::remove_dir_all(dst);
            return Err(e);
        }

        let Err(e) = remove(src) else {
            return Ok(());
        };
        let cause = format!("remove {src}: {e}");

        let undo = Self::copy_tree(dst.as_std_path(), src.as_std_path(), false)
            .and_then(|()| remove(dst).map_err(SError::from));
        match undo {
            Ok(()) => Err(SError::IOError(cause)),
            Err(undo) => Err(SError::IOError(format!(
                "{cause}; copy left at {dst}: {undo}"
            ))),
        }
    }

    /// With `overwrite` unset, entries already present at the destination
    /// are left as they are.
    fn copy_tree(src: &Path, dst: &Path, overwrite: bool) -> Result<(), SError> {
        std::fs::create_dir_all(dst)?;

        for entry in WalkDir::new(src) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(src)?;
            let dst_path = dst.join(rel_path);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                std::fs::create_dir_all(&dst_path)?;
                continue;
            }
            if dst_path.symlink_metadata().is_ok() {
                if !overwrite {
                    continue;
                }
                if file_type.is_symlink() {
                    std::fs::remove_file(&dst_path)?;
                }
            }
            if let Some(parent) = dst_path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            if file_type.is_symlink() {
                copy_symlink(entry.path(), &dst_path)?;
            } else {
                std::fs::copy(entry.path(), &dst_path)?;
            }
        }

        Ok(())
    }

    /// Immediate subdirectory names of `root`, skipping hidden entries.
    /// Entries that cannot be read or are not valid UTF-8 are skipped with a
    /// warning; only an unreadable `root` is an error.
    pub fn visible_subdirs(root: &Utf8Path) -> Result<Vec<String>, SError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry in {root}: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_ok_and(|t| t.is_dir()) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!("skipping non-UTF-8 folder in {root}: {:?}", entry.file_name());
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    pub fn exists_no_follow(path: &Utf8Path) -> bool {
        path.symlink_metadata().is_ok()
    }
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(std::fs::read_link(src)?, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::copy(src, dst).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn utf8(p: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(p.to_path_buf()).unwrap()
    }

    #[test]
    fn copy_then_remove_moves_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let root = utf8(tmp.path());
        let src = root.join("src");
        std::fs::create_dir_all(src.join("game/scripts")).unwrap();
        std::fs::write(src.join("game/scripts/a.rpy"), "label a").unwrap();

        let dst = root.join("dst");
        FileUtils::copy_then_remove(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(
            std::fs::read_to_string(dst.join("game/scripts/a.rpy")).unwrap(),
            "label a"
        );
    }

    #[test]
    fn visible_subdirs_skips_files_and_hidden() {
        let tmp = tempfile::tempdir().unwrap();
        let root = utf8(tmp.path());
        std::fs::create_dir(root.join("b")).unwrap();
        std::fs::create_dir(root.join("a")).unwrap();
        std::fs::create_dir(root.join(".cache")).unwrap();
        std::fs::write(root.join("readme.txt"), "").unwrap();

        assert_eq!(FileUtils::visible_subdirs(&root).unwrap(), ["a", "b"]);
    }

    #[test]
    fn failed_remove_puts_source_back_and_drops_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let root = utf8(tmp.path());
        let src = root.join("src");
        std::fs::create_dir_all(src.join("game")).unwrap();
        std::fs::write(src.join("game/a.rpy"), "a").unwrap();
        std::fs::write(src.join("game/b.bin"), "b").unwrap();
        let dst = root.join("dst");

        // Deletes one file of the source, then gives up.
        let src_for_remove = src.clone();
        let mut remove = |path: &Utf8Path| {
            if path == src_for_remove.as_path() {
                std::fs::remove_file(path.join("game/a.rpy"))?;
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "busy"));
            }
            std::fs::remove_dir_all(path)
        };
        let err = FileUtils::copy_then_remove_with(&src, &dst, &mut remove).unwrap_err();

        assert!(matches!(err, SError::IOError(ref m) if m.contains("busy")));
        assert_eq!(std::fs::read_to_string(src.join("game/a.rpy")).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(src.join("game/b.bin")).unwrap(), "b");
        assert!(!dst.exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_recreated() {
        let tmp = tempfile::tempdir().unwrap();
        let root = utf8(tmp.path());
        let src = root.join("src");
        std::fs::create_dir_all(src.join("assets")).unwrap();
        std::fs::write(src.join("assets/bg.png"), "png").unwrap();
        std::os::unix::fs::symlink("assets", src.join("images")).unwrap();
        std::os::unix::fs::symlink("assets/bg.png", src.join("cover.png")).unwrap();

        let dst = root.join("dst");
        FileUtils::copy_then_remove(&src, &dst).unwrap();

        assert_eq!(std::fs::read_link(dst.join("images")).unwrap(), Path::new("assets"));
        assert_eq!(
            std::fs::read_link(dst.join("cover.png")).unwrap(),
            Path::new("assets/bg.png")
        );
        assert_eq!(std::fs::read_to_string(dst.join("images/bg.png")).unwrap(), "png");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_folder_does_not_hide_the_rest() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        let root = utf8(tmp.path());
        std::fs::create_dir(root.join("2001")).unwrap();
        std::fs::create_dir(tmp.path().join(std::ffi::OsStr::from_bytes(b"bad\xff"))).unwrap();

        assert_eq!(FileUtils::visible_subdirs(&root).unwrap(), ["2001"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(FileUtils::visible_subdirs(&utf8(tmp.path()).join("nope")).is_err());
    }
}
