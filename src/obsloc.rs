//! # Obsloc: environment, site tables, and the `locate` entry point
//!
//! This module defines the [`Obsloc`] struct, the central façade that wires together:
//!
//! 1. **Environment state** ([`ObslocEnv`](crate::env_state::ObslocEnv)) – the shared HTTP client.
//! 2. **Site tables** – the static satellite registry, the excluded-site set, and the lazily
//!    fetched MPC ground-site table (fetched and parsed once, then retained).
//! 3. **Kernel staging** – the process-wide staging root handed to the
//!    [`KernelLoader`](crate::kernel::KernelLoader).
//!
//! The ephemeris engine is **not** owned here: it is an injected capability
//! ([`EphemerisEngine`](crate::engine::EphemerisEngine)) passed to every `locate` call, with
//! process-global override semantics documented on the trait.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use obsloc::obsloc::Obsloc;
//! use obsloc::query::LocateOptions;
//! # struct Spice;
//! # impl obsloc::engine::EphemerisEngine for Spice {
//! #     fn load_kernels(&self, _: &[camino::Utf8PathBuf]) -> Result<(), obsloc::obsloc_errors::ObslocError> { unimplemented!() }
//! #     fn position(&self, _: &str, _: &[f64], _: &str, _: &str, _: &str) -> Result<(Vec<nalgebra::Vector3<f64>>, Vec<f64>), obsloc::obsloc_errors::ObslocError> { unimplemented!() }
//! #     fn frame_transform(&self, _: &str, _: &str, _: f64) -> Result<nalgebra::Matrix3<f64>, obsloc::obsloc_errors::ObslocError> { unimplemented!() }
//! #     fn utc_jd_to_epoch(&self, _: f64) -> Result<f64, obsloc::obsloc_errors::ObslocError> { unimplemented!() }
//! # }
//! # let spice = Spice;
//!
//! let obsloc = Obsloc::new();
//!
//! // Where was TESS at this epoch, heliocentric, J2000?
//! let result = obsloc
//!     .locate(&spice, "-95", &[2458337.829157830], &LocateOptions::default())
//!     .unwrap();
//!
//! match result {
//!     Some(pos) => println!("{:?} AU", pos.positions[0]),
//!     None => println!("site not resolvable"),
//! }
//! ```

use std::collections::{HashMap, HashSet};

use camino::{Utf8Path, Utf8PathBuf};
use nalgebra::Vector3;
use once_cell::sync::OnceCell;

use crate::constants::{GroundSiteMap, JulianDate, SiteId, GEOCENTER};
use crate::engine::EphemerisEngine;
use crate::env_state::ObslocEnv;
use crate::kernel::{staging::default_staging_root, KernelLoader, KernelSpecifier};
use crate::obsloc_errors::ObslocError;
use crate::query::{ground_position, satellite_position, LocateOptions, SitePosition};
use crate::sites::ground::fetch_ground_sites;
use crate::sites::satellites::{excluded_sites, ground_support_specifier, satellite_registry};
use crate::sites::SiteCategory;

/// Central façade: HTTP environment, site tables and staging root.
#[derive(Debug)]
pub struct Obsloc {
    env: ObslocEnv,
    staging_root: Utf8PathBuf,
    satellites: HashMap<SiteId, KernelSpecifier>,
    ground_support: KernelSpecifier,
    excluded: HashSet<SiteId>,
    ground_sites: OnceCell<GroundSiteMap>,
}

impl Default for Obsloc {
    fn default() -> Self {
        Self::new()
    }
}

impl Obsloc {
    /// Create a façade staging kernels under the default user-scoped root.
    pub fn new() -> Self {
        Self::with_staging_root(default_staging_root())
    }

    /// Create a façade staging kernels under an explicit root directory.
    pub fn with_staging_root(staging_root: Utf8PathBuf) -> Self {
        Obsloc {
            env: ObslocEnv::new(),
            staging_root,
            satellites: satellite_registry(),
            ground_support: ground_support_specifier(),
            excluded: excluded_sites(),
            ground_sites: OnceCell::new(),
        }
    }

    pub fn staging_root(&self) -> &Utf8Path {
        &self.staging_root
    }

    /// Register an additional satellite mission (or replace a built-in entry).
    pub fn add_satellite(&mut self, spec: KernelSpecifier) {
        self.satellites.insert(spec.site_id.clone(), spec);
    }

    /// Replace the kernel requirements shared by all ground sites.
    pub fn set_ground_support(&mut self, spec: KernelSpecifier) {
        self.ground_support = spec;
    }

    /// Supply the ground-site table up front instead of fetching it from the MPC.
    ///
    /// Returns `false` when the table was already initialized (the supplied map is dropped).
    pub fn preload_ground_sites(&self, sites: GroundSiteMap) -> bool {
        self.ground_sites.set(sites).is_ok()
    }

    /// The ground-site table, fetched from the MPC observatory list on first use.
    pub fn ground_sites(&self) -> Result<&GroundSiteMap, ObslocError> {
        self.ground_sites
            .get_or_try_init(|| fetch_ground_sites(&self.env))
    }

    /// Classify a site identifier into its query category.
    ///
    /// The order is fixed and first-match-wins: ground table, then satellite registry, then
    /// the excluded set; anything else is unknown. An id present in more than one table
    /// resolves via the earlier category.
    pub fn classify(&self, site_id: &str) -> Result<SiteCategory<'_>, ObslocError> {
        if let Some(vector) = self.ground_sites()?.get(site_id) {
            return Ok(SiteCategory::Ground(*vector));
        }
        if let Some(spec) = self.satellites.get(site_id) {
            return Ok(SiteCategory::Satellite(spec));
        }
        if self.excluded.contains(site_id) {
            return Ok(SiteCategory::Excluded);
        }
        Ok(SiteCategory::Unknown)
    }

    /// Resolve the position of `site_id` at the given UTC Julian dates.
    ///
    /// Inputs are validated before any I/O. An unresolvable site is **not** an error: it
    /// yields `Ok(None)` unless the matching geocenter-substitution option is set, in which
    /// case the result equals a direct ground query for the geocenter code. Kernel
    /// configuration errors and an incomplete kernel set after the single fetch pass abort
    /// the query with an error.
    ///
    /// Arguments
    /// ---------
    /// * `engine`: the injected ephemeris engine handle
    /// * `site_id`: 3–4 character site/observatory code
    /// * `jd_utc`: UTC Julian dates of the requested epochs
    /// * `options`: center/frame/aberration and fallback behavior
    ///
    /// Return
    /// ------
    /// * `Ok(Some(SitePosition))` with positions in AU and light times in days
    /// * `Ok(None)` for an unresolvable site
    /// * `Err(ObslocError)` for invalid input or a fatal kernel failure
    pub fn locate<E: EphemerisEngine>(
        &self,
        engine: &E,
        site_id: &str,
        jd_utc: &[JulianDate],
        options: &LocateOptions,
    ) -> Result<Option<SitePosition>, ObslocError> {
        check_site_id(site_id)?;
        check_julian_dates(jd_utc)?;

        let loader = KernelLoader::new(&self.env, &self.staging_root);

        match self.classify(site_id)? {
            SiteCategory::Ground(site_vector) => ground_position(
                &loader,
                &self.ground_support,
                engine,
                site_id,
                &site_vector,
                jd_utc,
                options,
            )
            .map(Some),
            SiteCategory::Satellite(spec) => {
                satellite_position(&loader, spec, engine, jd_utc, options).map(Some)
            }
            SiteCategory::Excluded if options.exclude_as_geocenter => self
                .geocenter_position(&loader, engine, jd_utc, options)
                .map(Some),
            SiteCategory::Unknown if options.unknown_as_geocenter => self
                .geocenter_position(&loader, engine, jd_utc, options)
                .map(Some),
            SiteCategory::Excluded | SiteCategory::Unknown => Ok(None),
        }
    }

    /// Ground query for the canonical geocenter site id.
    fn geocenter_position<E: EphemerisEngine>(
        &self,
        loader: &KernelLoader<'_>,
        engine: &E,
        jd_utc: &[JulianDate],
        options: &LocateOptions,
    ) -> Result<SitePosition, ObslocError> {
        let site_vector = self
            .ground_sites()?
            .get(GEOCENTER)
            .copied()
            .unwrap_or_else(Vector3::zeros);
        ground_position(
            loader,
            &self.ground_support,
            engine,
            GEOCENTER,
            &site_vector,
            jd_utc,
            options,
        )
    }
}

/// Site codes are 3 or 4 characters, rejected synchronously before any I/O.
fn check_site_id(site_id: &str) -> Result<(), ObslocError> {
    if !(3..=4).contains(&site_id.chars().count()) {
        return Err(ObslocError::InvalidSiteId(site_id.to_string()));
    }
    Ok(())
}

/// A plausible Julian date for an observation has exactly 7 digits before the decimal point.
fn check_julian_dates(jd_utc: &[JulianDate]) -> Result<(), ObslocError> {
    for &jd in jd_utc {
        if !jd.is_finite() || !(1_000_000.0..10_000_000.0).contains(&jd) {
            return Err(ObslocError::InvalidJulianDate(jd));
        }
    }
    Ok(())
}
