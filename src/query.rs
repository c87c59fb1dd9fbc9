//! # Position queries
//!
//! Satellite and ground query paths, plus the option/result types of the public entry point.
//! Both paths follow the same shape: load the site's kernels through the
//! [`KernelLoader`], convert the input UTC Julian dates to engine epochs, evaluate with the
//! engine, and convert km → AU and seconds → days.
//!
//! The ground path differs in that the site itself has no ephemeris: its fixed body-fixed
//! vector is rotated into the requested frame per epoch (the rotation is time-dependent due to
//! Earth orientation) and added to the geocenter's position from the engine.

use nalgebra::Vector3;

use crate::constants::{
    JulianDate, SiteId, AU_KM, BODY_FIXED_FRAME, EARTH_NAIF_ID, SECONDS_PER_DAY,
};
use crate::engine::EphemerisEngine;
use crate::kernel::{KernelLoader, KernelSpecifier};
use crate::obsloc_errors::ObslocError;

/// Options of a [`locate`](crate::obsloc::Obsloc::locate) call.
#[derive(Debug, Clone)]
pub struct LocateOptions {
    /// Coordinate center body (NAIF id or name).
    pub center: String,
    /// Output reference frame.
    pub frame: String,
    /// Aberration correction flag, passed through to the engine opaquely.
    pub abcorr: String,
    /// Substitute the geocenter for site ids in the excluded table.
    pub exclude_as_geocenter: bool,
    /// Substitute the geocenter for site ids not present in any table.
    pub unknown_as_geocenter: bool,
}

impl Default for LocateOptions {
    fn default() -> Self {
        LocateOptions {
            center: "SUN".to_string(),
            frame: "J2000".to_string(),
            abcorr: "NONE".to_string(),
            exclude_as_geocenter: false,
            unknown_as_geocenter: false,
        }
    }
}

/// Result of a position query: one epoch, position and light time per input timestamp.
///
/// Created fresh per call and immutable afterwards; nothing is cached across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct SitePosition {
    /// The site the result describes (after any geocenter substitution).
    pub site_id: SiteId,
    /// Engine-internal epochs, one per input Julian date.
    pub epochs: Vec<f64>,
    /// Site positions in **AU**, one per epoch.
    pub positions: Vec<Vector3<f64>>,
    /// One-way light times in **days**, one per epoch.
    pub light_times: Vec<f64>,
}

fn convert_epochs<E: EphemerisEngine>(
    engine: &E,
    jd_utc: &[JulianDate],
) -> Result<Vec<f64>, ObslocError> {
    jd_utc.iter().map(|jd| engine.utc_jd_to_epoch(*jd)).collect()
}

/// Satellite path: the site id is itself an ephemeris target of the loaded kernel set.
pub(crate) fn satellite_position<E: EphemerisEngine>(
    loader: &KernelLoader<'_>,
    spec: &KernelSpecifier,
    engine: &E,
    jd_utc: &[JulianDate],
    options: &LocateOptions,
) -> Result<SitePosition, ObslocError> {
    loader.load(spec, engine)?;

    let epochs = convert_epochs(engine, jd_utc)?;
    let (positions_km, light_times_s) = engine.position(
        &spec.site_id,
        &epochs,
        &options.frame,
        &options.abcorr,
        &options.center,
    )?;

    Ok(SitePosition {
        site_id: spec.site_id.clone(),
        epochs,
        positions: positions_km.iter().map(|p| p / AU_KM).collect(),
        light_times: light_times_s.iter().map(|lt| lt / SECONDS_PER_DAY).collect(),
    })
}

/// Ground path: geocenter position from the engine plus the site's rotated body-fixed vector.
pub(crate) fn ground_position<E: EphemerisEngine>(
    loader: &KernelLoader<'_>,
    ground_spec: &KernelSpecifier,
    engine: &E,
    site_id: &str,
    site_vector_km: &Vector3<f64>,
    jd_utc: &[JulianDate],
    options: &LocateOptions,
) -> Result<SitePosition, ObslocError> {
    loader.load(ground_spec, engine)?;

    let epochs = convert_epochs(engine, jd_utc)?;
    let (geocenter_km, light_times_s) = engine.position(
        EARTH_NAIF_ID,
        &epochs,
        &options.frame,
        &options.abcorr,
        &options.center,
    )?;

    let mut positions = Vec::with_capacity(epochs.len());
    for (geocenter, epoch) in geocenter_km.iter().zip(&epochs) {
        // Earth orientation makes the rotation time-dependent: one matrix per epoch
        let rotation = engine.frame_transform(BODY_FIXED_FRAME, &options.frame, *epoch)?;
        positions.push((geocenter + rotation * site_vector_km) / AU_KM);
    }

    Ok(SitePosition {
        site_id: site_id.to_string(),
        epochs,
        positions,
        light_times: light_times_s.iter().map(|lt| lt / SECONDS_PER_DAY).collect(),
    })
}
