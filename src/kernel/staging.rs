//! # Staging directory layout
//!
//! Downloaded kernels live under a process-wide root directory: one subdirectory per satellite
//! site id, and the shared ground-support files directly under the root (ground sites are not
//! namespaced per site). The root defaults to the user cache directory and falls back to the
//! current working directory when that cannot be created.

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use std::{fs, io};
use tracing::warn;

use super::specifier::KernelSpecifier;

/// Default root of the kernel staging area.
///
/// `<user cache dir>/obsloc_cache/kernels`, created on first use. When the cache directory
/// cannot be located or created, kernels are staged in the current working directory instead
/// (with a warning), so the crate stays usable in restricted environments.
pub fn default_staging_root() -> Utf8PathBuf {
    let Some(base) = BaseDirs::new() else {
        warn!("cannot locate a user cache directory; staging kernels in the working directory");
        return Utf8PathBuf::from(".");
    };
    let Some(cache) = Utf8Path::from_path(base.cache_dir()) else {
        warn!("user cache directory is not valid UTF-8; staging kernels in the working directory");
        return Utf8PathBuf::from(".");
    };
    let root = cache.join("obsloc_cache").join("kernels");
    match fs::create_dir_all(&root) {
        Ok(()) => root,
        Err(err) => {
            warn!(
                %err,
                "unable to create {root}; staging kernels in the working directory"
            );
            Utf8PathBuf::from(".")
        }
    }
}

/// Staging directory for one specifier: the shared root for ground support, a per-site
/// subdirectory otherwise. Created on demand; idempotent to request repeatedly.
pub fn staging_dir(root: &Utf8Path, spec: &KernelSpecifier) -> io::Result<Utf8PathBuf> {
    let dir = if spec.is_shared() {
        root.to_path_buf()
    } else {
        root.join(&spec.site_id)
    };
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
