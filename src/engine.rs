//! # Ephemeris engine capability
//!
//! `obsloc` does not evaluate ephemerides itself. All numerical work is delegated to an
//! implementation of [`EphemerisEngine`] supplied by the caller (typically a thin adapter over
//! a SPICE binding): loading a kernel set, evaluating body positions and light times, rotating
//! vectors between reference frames, and converting a UTC Julian date into the engine's
//! internal continuous time.
//!
//! ## Override semantics (important)
//!
//! The engine's loaded-kernel working set is assumed to be **process-global**: loading one
//! site's kernels can shadow previously loaded data for competing time ranges or bodies, with
//! later-loaded kernels taking precedence. `obsloc` therefore always hands kernels to
//! [`load_kernels`](EphemerisEngine::load_kernels) in the specifier's declared order, and
//! callers interleaving queries for different sites within one process must not assume
//! isolation between them. Tests should use a fresh engine (or reset its working set) per case.

use camino::Utf8PathBuf;
use nalgebra::{Matrix3, Vector3};

use crate::constants::JulianDate;
use crate::obsloc_errors::ObslocError;

/// Narrow interface to an external ephemeris-evaluation engine.
///
/// Positions are returned in **km** and light times in **seconds**; unit conversion to AU/days
/// is the responsibility of the query layer, not the engine.
pub trait EphemerisEngine {
    /// Load the given kernel files into the engine's active working set, in order.
    ///
    /// An error signals that the set could not be loaded (e.g. files absent); the kernel
    /// loader reacts by fetching and retrying once.
    fn load_kernels(&self, paths: &[Utf8PathBuf]) -> Result<(), ObslocError>;

    /// Evaluate the position of `target` relative to `center` at each epoch.
    ///
    /// Arguments
    /// ---------
    /// * `target`: NAIF id or name of the observed body/spacecraft
    /// * `epochs`: engine-internal epochs (see [`utc_jd_to_epoch`](EphemerisEngine::utc_jd_to_epoch))
    /// * `frame`: output reference frame (e.g. `"J2000"`)
    /// * `abcorr`: aberration correction flag, passed through opaquely
    /// * `center`: NAIF id or name of the coordinate center
    ///
    /// Return
    /// ------
    /// * One position vector in **km** and one light time in **seconds** per epoch
    #[allow(clippy::type_complexity)]
    fn position(
        &self,
        target: &str,
        epochs: &[f64],
        frame: &str,
        abcorr: &str,
        center: &str,
    ) -> Result<(Vec<Vector3<f64>>, Vec<f64>), ObslocError>;

    /// Rotation matrix taking vectors from `from_frame` into `to_frame` at `epoch`.
    ///
    /// The rotation is time-dependent (Earth orientation), so one matrix is needed per epoch.
    fn frame_transform(
        &self,
        from_frame: &str,
        to_frame: &str,
        epoch: f64,
    ) -> Result<Matrix3<f64>, ObslocError>;

    /// Convert a UTC Julian date into the engine's internal continuous time value.
    ///
    /// Requires a leap-second kernel in the active set, hence the loader runs first.
    fn utc_jd_to_epoch(&self, jd_utc: JulianDate) -> Result<f64, ObslocError>;
}
