//! # Kernel loader orchestration
//!
//! Ensures the external ephemeris engine has a specifier's files in its active working set,
//! with a two-phase "optimistic load, fetch-and-retry-once on failure" contract:
//!
//! 1. refresh time-critical files (best effort, never fatal);
//! 2. hand the expected local paths straight to the engine; on a warm cache this succeeds
//!    without any presence check;
//! 3. if the engine refuses (files absent), run the remote fetcher and retry the load exactly
//!    once. A second failure propagates to the caller.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::engine::EphemerisEngine;
use crate::env_state::ObslocEnv;
use crate::obsloc_errors::ObslocError;

use super::fetch::fetch;
use super::specifier::KernelSpecifier;
use super::staging::staging_dir;
use super::staleness::refresh_time_critical;

/// Orchestrates presence, freshness and engine loading for kernel specifiers.
pub struct KernelLoader<'a> {
    env: &'a ObslocEnv,
    staging_root: &'a Utf8Path,
}

impl<'a> KernelLoader<'a> {
    pub fn new(env: &'a ObslocEnv, staging_root: &'a Utf8Path) -> Self {
        KernelLoader { env, staging_root }
    }

    /// Make the specifier's kernel set active in `engine`.
    ///
    /// Load order is preserved (explicit files in declared order, wildcard matches after),
    /// and time-critical refreshes happen before the load, keeping the engine's
    /// later-takes-precedence override semantics deterministic.
    ///
    /// Return
    /// ------
    /// * The loaded local paths, or a fatal error when the set cannot be completed or the
    ///   engine rejects it twice.
    pub fn load<E: EphemerisEngine>(
        &self,
        spec: &KernelSpecifier,
        engine: &E,
    ) -> Result<Vec<Utf8PathBuf>, ObslocError> {
        let dir = staging_dir(self.staging_root, spec)?;

        refresh_time_critical(spec, &dir);

        let paths = spec.expected_local_paths(self.env, &dir)?;
        if let Err(err) = engine.load_kernels(&paths) {
            debug!(site = %spec.site_id, %err, "optimistic kernel load failed, fetching");
            fetch(self.env, spec, &dir)?;
            engine.load_kernels(&paths)?;
        }
        Ok(paths)
    }
}
