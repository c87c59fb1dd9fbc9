//! # Kernel specifier and local-presence checking
//!
//! A [`KernelSpecifier`] describes, for one site identifier, the set of kernel files that site
//! needs: explicit URLs, wildcard directory patterns of the form `prefix*suffix`, and the
//! time-critical subset that must be refreshed periodically.
//!
//! The full remote file set (explicit files plus wildcard matches) is resolved against the live
//! remote directory listing **once per process** and then snapshotted in a
//! [`OnceCell`](once_cell::sync::OnceCell). The snapshot can drift from the remote listing if new
//! matching files appear later; presence checks deliberately reuse it rather than re-listing,
//! keeping the warm-cache path free of network round-trips.
//!
//! Presence checking is all-or-nothing: a requirement set is satisfied only if **every**
//! expected path exists as a regular file. There is no partial-success state.

use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::OnceCell;

use crate::constants::GROUND_SENTINEL;
use crate::env_state::ObslocEnv;
use crate::obsloc_errors::ObslocError;

use super::fetch::list_remote_files;

/// A `prefix*suffix` file-name pattern with at most one wildcard character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WildcardPattern {
    prefix: String,
    suffix: String,
}

impl WildcardPattern {
    /// Parse a pattern string. Zero `*` means "starts with the whole pattern";
    /// two or more `*` is a configuration error, reported immediately.
    pub(crate) fn parse(pattern: &str) -> Result<Self, ObslocError> {
        match pattern.split_once('*') {
            None => Ok(WildcardPattern {
                prefix: pattern.to_string(),
                suffix: String::new(),
            }),
            Some((prefix, suffix)) if !suffix.contains('*') => Ok(WildcardPattern {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }),
            Some(_) => Err(ObslocError::InvalidWildcardPattern(pattern.to_string())),
        }
    }

    pub(crate) fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
            && name.ends_with(&self.suffix)
            && name.len() >= self.prefix.len() + self.suffix.len()
    }
}

/// Last path component of a remote file URL, used as the local file name.
pub(crate) fn file_name_from_url(url: &str) -> Result<&str, ObslocError> {
    url.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ObslocError::InvalidUrl(url.to_string()))
}

/// The kernel-file requirements of one observing site.
///
/// Invariants, enforced at construction:
/// - `site_id` and `display_name` are always set;
/// - `explicit_files` is non-empty (a specifier with zero required files is invalid);
/// - every wildcard pattern contains at most one `*`;
/// - `time_critical_files` is a subset of `explicit_files`.
///
/// Order matters: later-loaded kernels override earlier ones for competing data, so
/// `explicit_files` is handed to the engine in declared order, followed by wildcard matches.
#[derive(Debug, Clone)]
pub struct KernelSpecifier {
    /// Site identifier (3–4 character code, or the `"GROUND"` sentinel).
    pub site_id: String,
    /// Human label; `"GROUND"` signals the shared (non-per-site) staging directory.
    pub display_name: String,
    /// Remote locations of the explicitly required files, in load order.
    pub explicit_files: Vec<String>,
    /// `(directory URL, prefix*suffix pattern)` pairs discovered at load time.
    pub wildcard_patterns: Vec<(String, String)>,
    /// Subset of `explicit_files` that must be refreshed when older than the threshold.
    pub time_critical_files: Vec<String>,
    /// Construction-time snapshot of the full remote file set (explicit + wildcard matches).
    resolved_files: OnceCell<Vec<String>>,
}

impl KernelSpecifier {
    /// Build and validate a specifier.
    ///
    /// Return
    /// ------
    /// * The specifier, or a configuration error for an empty file set, a malformed
    ///   wildcard pattern, or a time-critical file that is not an explicit file.
    pub fn new(
        site_id: &str,
        display_name: &str,
        explicit_files: Vec<String>,
        wildcard_patterns: Vec<(String, String)>,
        time_critical_files: Vec<String>,
    ) -> Result<Self, ObslocError> {
        if explicit_files.is_empty() {
            return Err(ObslocError::EmptyKernelSpecifier(site_id.to_string()));
        }
        for (_, pattern) in &wildcard_patterns {
            WildcardPattern::parse(pattern)?;
        }
        for file in &explicit_files {
            file_name_from_url(file)?;
        }
        for file in &time_critical_files {
            if !explicit_files.contains(file) {
                return Err(ObslocError::TimeCriticalNotExplicit(
                    site_id.to_string(),
                    file.clone(),
                ));
            }
        }
        Ok(KernelSpecifier {
            site_id: site_id.to_string(),
            display_name: display_name.to_string(),
            explicit_files,
            wildcard_patterns,
            time_critical_files,
            resolved_files: OnceCell::new(),
        })
    }

    /// Whether this specifier stages its files in the shared root directory.
    pub fn is_shared(&self) -> bool {
        self.display_name == GROUND_SENTINEL
    }

    /// The full remote file set: explicit files plus wildcard matches.
    ///
    /// Resolved against the live remote listing on first call, then snapshotted for the
    /// lifetime of the process. A listing failure here is fatal: without it the requirement
    /// set is unknown.
    pub fn resolved_remote_files(&self, env: &ObslocEnv) -> Result<&[String], ObslocError> {
        self.resolved_files
            .get_or_try_init(|| {
                let mut files = self.explicit_files.clone();
                for (listing_url, pattern) in &self.wildcard_patterns {
                    let wildcard = WildcardPattern::parse(pattern)?;
                    files.extend(list_remote_files(env, listing_url, &wildcard)?);
                }
                Ok(files)
            })
            .map(Vec::as_slice)
    }

    /// Local paths every required file must occupy under `dir`.
    pub fn expected_local_paths(
        &self,
        env: &ObslocEnv,
        dir: &Utf8Path,
    ) -> Result<Vec<Utf8PathBuf>, ObslocError> {
        self.resolved_remote_files(env)?
            .iter()
            .map(|url| Ok(dir.join(file_name_from_url(url)?)))
            .collect()
    }

    /// Expected paths that do not exist as regular files under `dir`.
    pub fn missing_local_paths(
        &self,
        env: &ObslocEnv,
        dir: &Utf8Path,
    ) -> Result<Vec<Utf8PathBuf>, ObslocError> {
        Ok(self
            .expected_local_paths(env, dir)?
            .into_iter()
            .filter(|path| !path.is_file())
            .collect())
    }

    /// All-or-nothing presence check: `true` only when every expected file is present.
    pub fn is_complete(&self, env: &ObslocEnv, dir: &Utf8Path) -> Result<bool, ObslocError> {
        Ok(self.missing_local_paths(env, dir)?.is_empty())
    }
}
