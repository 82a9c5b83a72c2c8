use crate::config::{AppConfig, CrossDevicePolicy};
use crate::models::error::SError;
use crate::models::library::Catalog;
use crate::models::move_record::{
    MoveFailure, MoveRecord, RelocationFailure, RelocationReport, RestoreReport,
};
use crate::utils::file::FileUtils;
use camino::Utf8Path;
use std::io;
use tracing::{error, info, warn};

/// Asked once per relocation pass before the first copy-and-delete fallback.
pub trait CopyConsent {
    fn confirm_copy(&mut self, src: &Utf8Path, dst: &Utf8Path, cause: &SError) -> bool;
}

impl<F> CopyConsent for F
where
    F: FnMut(&Utf8Path, &Utf8Path, &SError) -> bool,
{
    fn confirm_copy(&mut self, src: &Utf8Path, dst: &Utf8Path, cause: &SError) -> bool {
        self(src, dst, cause)
    }
}

/// Declines every fallback. Used where nobody can answer a prompt.
pub struct NoConsent;

impl CopyConsent for NoConsent {
    fn confirm_copy(&mut self, _src: &Utf8Path, _dst: &Utf8Path, _cause: &SError) -> bool {
        false
    }
}

/// Filesystem primitives the relocation passes move folders with.
pub trait Mover {
    fn rename(&mut self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove_tree(&mut self, path: &Utf8Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}

/// The real filesystem.
pub struct FsMover;

impl Mover for FsMover {}

fn copy_then_remove(mover: &mut dyn Mover, src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
    FileUtils::copy_then_remove_with(src, dst, &mut |path: &Utf8Path| mover.remove_tree(path))
}

/// Moves every disabled mod folder from the workshop root into the holding
/// directory, in catalog order.
///
/// Folders already absent from the root are skipped. A rename that fails is
/// retried as copy + delete once the configured policy (or the operator)
/// allows it; declining aborts the pass and hands back what was already
/// moved so the caller can restore it.
pub fn relocate_disabled(
    catalog: &Catalog,
    config: &AppConfig,
    consent: &mut dyn CopyConsent,
) -> Result<RelocationReport, RelocationFailure> {
    relocate_disabled_with(catalog, config, consent, &mut FsMover)
}

pub fn relocate_disabled_with(
    catalog: &Catalog,
    config: &AppConfig,
    consent: &mut dyn CopyConsent,
    mover: &mut dyn Mover,
) -> Result<RelocationReport, RelocationFailure> {
    let root = &config.workshop_root;
    let holding = config.holding_dir();
    let mut report = RelocationReport::default();

    if let Err(e) = std::fs::create_dir_all(&holding) {
        return Err(RelocationFailure {
            record: report.record,
            error: SError::IOError(format!("create {holding}: {e}")),
        });
    }

    let mut copy_allowed = config.cross_device == CrossDevicePolicy::Always;

    for entry in catalog.disabled() {
        let src = root.join(&entry.folder);
        let dst = holding.join(&entry.folder);

        if !FileUtils::exists_no_follow(&src) {
            continue;
        }

        if FileUtils::exists_no_follow(&dst) {
            warn!("holding slot occupied, leaving {} in place", entry.folder);
            report.failures.push(MoveFailure {
                path: src,
                error: SError::HoldingOccupied(dst.to_string()),
            });
            continue;
        }

        if let Err(e) = mover.rename(&src, &dst) {
            let cause = SError::IOError(format!("rename {src} -> {dst}: {e}"));

            if !copy_allowed {
                copy_allowed = match config.cross_device {
                    CrossDevicePolicy::Always => true,
                    CrossDevicePolicy::Never => false,
                    CrossDevicePolicy::Ask => consent.confirm_copy(&src, &dst, &cause),
                };
                if !copy_allowed {
                    warn!("copy fallback declined, aborting relocation after {} move(s)", report.record.len());
                    return Err(RelocationFailure {
                        record: report.record,
                        error: SError::CopyDeclined,
                    });
                }
            }

            warn!("{cause}; falling back to copy");
            if let Err(e) = copy_then_remove(mover, &src, &dst) {
                error!("failed to relocate {}: {e}", entry.folder);
                report.failures.push(MoveFailure { path: src, error: e });
                continue;
            }
        }

        info!("relocated {} -> {}", src, dst);
        report.record.push(src, dst);
    }

    Ok(report)
}

/// Undoes a relocation pass, last moved first.
///
/// An original location that has been re-occupied is left alone. Each pair
/// is independent: a failure is recorded and the remaining pairs are still
/// attempted.
pub fn restore(record: MoveRecord) -> RestoreReport {
    restore_with(record, &mut FsMover)
}

pub fn restore_with(record: MoveRecord, mover: &mut dyn Mover) -> RestoreReport {
    let mut report = RestoreReport::default();

    for pair in record.into_restore_order() {
        let (from, to) = (&pair.relocated, &pair.original);

        if FileUtils::exists_no_follow(to) {
            warn!("destination exists, skipping restore: {to}");
            report.skipped.push(to.clone());
            continue;
        }

        let moved = match mover.rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("rename {from} -> {to} failed ({e}); falling back to copy");
                copy_then_remove(mover, from, to)
            }
        };

        match moved {
            Ok(()) => {
                info!("restored {to}");
                report.restored.push(to.clone());
            }
            Err(e) => {
                error!("restore error for {to}: {e}");
                report.failures.push(MoveFailure {
                    path: to.clone(),
                    error: e,
                });
            }
        }
    }

    report
}
