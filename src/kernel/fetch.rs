//! # Remote fetcher
//!
//! Downloads a specifier's explicit files and resolves+downloads its wildcard matches from a
//! remote directory listing, then re-checks local presence.
//!
//! Kernel files can be hundreds of megabytes (planetary SPK files), so downloads are streamed
//! to disk chunk by chunk with `reqwest` + `tokio` rather than buffered through the text HTTP
//! client. Everything is sequential and blocking from the caller's point of view: one runtime
//! is created per fetch pass and each download is driven to completion before the next starts.
//!
//! A single file that fails to download is logged and skipped; the aggregate completeness
//! check at the end of the pass decides whether the operation failed. If the set is still
//! incomplete after one pass, the error is fatal to the calling operation; there is no retry
//! or backoff policy.

use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::{fs::File, io::AsyncWriteExt};
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::env_state::ObslocEnv;
use crate::obsloc_errors::ObslocError;

use super::specifier::{file_name_from_url, KernelSpecifier, WildcardPattern};

static HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<a\s[^>]*href\s*=\s*"([^"]+)""#).expect("invalid href regex"));

/// Anchor targets of an HTML directory listing, in document order.
pub(crate) fn extract_hrefs(body: &str) -> Vec<String> {
    HREF_RE
        .captures_iter(body)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// List the files at a remote directory URL whose names match `wildcard`,
/// returned as full URLs.
pub(crate) fn list_remote_files(
    env: &ObslocEnv,
    listing_url: &str,
    wildcard: &WildcardPattern,
) -> Result<Vec<String>, ObslocError> {
    let body = env.get_from_url(listing_url)?;
    let base = listing_url.trim_end_matches('/');
    Ok(extract_hrefs(&body)
        .into_iter()
        .filter(|name| wildcard.matches(name))
        .map(|name| format!("{base}/{name}"))
        .collect())
}

/// Stream a file from `url` to `path`, chunk by chunk.
///
/// The stream goes to an in-progress `<name>.part` file that is renamed to its final name only
/// after the last chunk is flushed. An interrupted download therefore never leaves a truncated
/// file under the final name, which the presence checker would mistake for a complete kernel;
/// the `.part` remnant is removed on error.
async fn download_big_file(url: &str, path: &Utf8Path) -> Result<(), ObslocError> {
    let part = Utf8PathBuf::from(format!("{path}.part"));
    match stream_to_file(url, &part).await {
        Ok(()) => {
            tokio::fs::rename(&part, path).await?;
            Ok(())
        }
        Err(err) => {
            let _ = tokio::fs::remove_file(&part).await;
            Err(err)
        }
    }
}

async fn stream_to_file(url: &str, path: &Utf8Path) -> Result<(), ObslocError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        file.write_all(&chunk_result?).await?;
    }
    file.flush().await?;
    Ok(())
}

/// Download one remote file into `dir`, blocking until done.
pub(crate) fn download_file(url: &str, dir: &Utf8Path) -> Result<Utf8PathBuf, ObslocError> {
    let rt = tokio::runtime::Runtime::new()?;
    download_file_on(&rt, url, dir)
}

fn download_file_on(
    rt: &tokio::runtime::Runtime,
    url: &str,
    dir: &Utf8Path,
) -> Result<Utf8PathBuf, ObslocError> {
    let path = dir.join(file_name_from_url(url)?);
    rt.block_on(download_big_file(url, &path))?;
    debug!(url, "downloaded kernel file");
    Ok(path)
}

/// Fetch every file the specifier requires into `dir`, then verify completeness.
///
/// Return
/// ------
/// * `Ok(())` when the local set is complete after the pass
/// * [`ObslocError::InvalidWildcardPattern`] immediately on a malformed pattern
/// * [`ObslocError::IncompleteKernelSet`] when files are still missing afterwards; fatal,
///   the caller is expected to abort the operation that needed the kernels
pub fn fetch(env: &ObslocEnv, spec: &KernelSpecifier, dir: &Utf8Path) -> Result<(), ObslocError> {
    let rt = tokio::runtime::Runtime::new()?;

    for url in &spec.explicit_files {
        if let Err(err) = download_file_on(&rt, url, dir) {
            warn!(%url, %err, "kernel download failed, skipping");
        }
    }

    for (listing_url, pattern) in &spec.wildcard_patterns {
        let wildcard = WildcardPattern::parse(pattern)?;
        match list_remote_files(env, listing_url, &wildcard) {
            Ok(matches) => {
                for url in matches {
                    if let Err(err) = download_file_on(&rt, &url, dir) {
                        warn!(%url, %err, "kernel download failed, skipping");
                    }
                }
            }
            Err(err) => {
                warn!(%listing_url, %err, "directory listing failed, skipping wildcard");
            }
        }
    }

    let missing = spec.missing_local_paths(env, dir)?;
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ObslocError::IncompleteKernelSet {
            site: spec.site_id.clone(),
            missing,
        })
    }
}
