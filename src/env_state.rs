//! # Obsloc environment state
//!
//! This module defines [`ObslocEnv`], the **shared environment object** passed to every part of
//! the crate that talks to the network. It owns a persistent [`ureq::Agent`] used for small text
//! resources: remote directory listings (wildcard expansion) and the MPC observatory-code table.
//!
//! Large binary kernel files are *not* fetched through this agent; they go through the streaming
//! download path in [`crate::kernel::fetch`], which has no global timeout (a kernel download is
//! allowed to take as long as it takes).
//!
//! The object is cheaply cloneable and is meant to be created once and shared.

use std::convert::TryFrom;
use std::{fmt::Debug, time::Duration};
use ureq::{
    http::{self, Uri},
    Agent,
};

use crate::obsloc_errors::ObslocError;

/// Shared environment state: a configured HTTP client for text resources.
#[derive(Debug, Clone)]
pub struct ObslocEnv {
    pub http_client: Agent,
}

impl Default for ObslocEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl ObslocEnv {
    /// Create a new environment with a default-configured HTTP client
    /// (10 second global timeout, suitable for listings and tables).
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .build();
        let agent: Agent = config.into();

        ObslocEnv { http_client: agent }
    }

    /// GET a URL and return its body as text.
    ///
    /// Arguments
    /// ---------
    /// * `url`: the resource to fetch
    ///
    /// Return
    /// ------
    /// * The response body, or an [`ObslocError`] on transport failure
    pub(crate) fn get_from_url<U>(&self, url: U) -> Result<String, ObslocError>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        Ok(self
            .http_client
            .get(url)
            .call()?
            .body_mut()
            .read_to_string()?)
    }
}
