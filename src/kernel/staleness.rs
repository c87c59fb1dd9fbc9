//! # Staleness refresher for time-critical kernels
//!
//! Some kernels lose accuracy with age (Earth orientation reconstructions, spacecraft
//! ephemeris predicts). For each file a specifier marks time-critical, this module compares
//! the local modification age against the one-day threshold and re-fetches the file when it is
//! strictly older.
//!
//! The refresh is best-effort by design: missing data is fatal elsewhere, but **stale data is
//! tolerable**. The old copy is renamed aside (never deleted) while the replacement downloads,
//! and is renamed back if the download fails, so the caller always keeps a usable file.

use camino::Utf8Path;
use std::fs;
use std::time::SystemTime;
use tracing::{debug, warn};

use crate::constants::{SECONDS_PER_DAY, STALENESS_THRESHOLD_DAYS};

use super::fetch::download_file;
use super::specifier::{file_name_from_url, KernelSpecifier};

/// Whether a file modified at `modified` is stale at `now`.
///
/// Age exactly at the threshold is still fresh; only a strictly greater age triggers a
/// refresh. A modification time in the future is treated as fresh.
pub(crate) fn is_stale(modified: SystemTime, now: SystemTime) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age.as_secs_f64() / SECONDS_PER_DAY > STALENESS_THRESHOLD_DAYS,
        Err(_) => false,
    }
}

/// Re-fetch every stale time-critical file of `spec` staged in `dir`.
///
/// Never fails: refresh problems are logged and the existing (possibly stale) file remains
/// in place for the subsequent load.
pub fn refresh_time_critical(spec: &KernelSpecifier, dir: &Utf8Path) {
    let now = SystemTime::now();

    for url in &spec.time_critical_files {
        // validated at specifier construction
        let Ok(name) = file_name_from_url(url) else {
            continue;
        };
        let path = dir.join(name);

        let Ok(modified) = fs::metadata(&path).and_then(|meta| meta.modified()) else {
            // absent file: the loader's fetch path is responsible for it
            continue;
        };
        if !is_stale(modified, now) {
            continue;
        }

        let aside = dir.join(format!("{name}.stale"));
        if let Err(err) = fs::rename(&path, &aside) {
            warn!(%path, %err, "could not set stale kernel aside, keeping it");
            continue;
        }

        match download_file(url, dir) {
            Ok(_) => {
                debug!(%path, "refreshed time-critical kernel");
                if let Err(err) = fs::remove_file(&aside) {
                    warn!(%aside, %err, "could not remove superseded kernel copy");
                }
            }
            Err(err) => {
                warn!(%url, %err, "refresh failed, restoring stale copy");
                if let Err(err) = fs::rename(&aside, &path) {
                    warn!(%path, %err, "could not restore stale kernel copy");
                }
            }
        }
    }
}
