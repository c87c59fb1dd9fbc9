//! # Ground-site table from the MPC observatory-code list
//!
//! Builds the ground-site lookup (MPC code → body-fixed geocentric vector in km) by fetching
//! the Minor Planet Center observatory list and parsing its fixed-width `<pre>` block. Each row
//! carries the site's east longitude and parallax factors ρ·cosφ / ρ·sinφ in Earth radii; the
//! vector is
//!
//! ```text
//! x = ρcosφ · cos λ · R⊕    y = ρcosφ · sin λ · R⊕    z = ρsinφ · R⊕
//! ```
//!
//! Rows without complete parallax data (spacecraft and roving codes) are skipped. The
//! geocenter code `"500"` is always present and maps to the zero vector.

use nalgebra::Vector3;

use crate::constants::{GroundSiteMap, EARTH_RADIUS_KM, GEOCENTER, RADEG};
use crate::env_state::ObslocEnv;
use crate::obsloc_errors::ObslocError;

pub(crate) const MPC_OBS_CODES_URL: &str =
    "https://www.minorplanetcenter.net/iau/lists/ObsCodes.html";

/// Fetch and parse the MPC observatory-code table.
pub(crate) fn fetch_ground_sites(env: &ObslocEnv) -> Result<GroundSiteMap, ObslocError> {
    let body = env.get_from_url(MPC_OBS_CODES_URL)?;
    parse_obs_codes(&body)
}

/// Parse the `<pre>`-wrapped fixed-width observatory table.
pub(crate) fn parse_obs_codes(body: &str) -> Result<GroundSiteMap, ObslocError> {
    let table = body
        .trim()
        .strip_prefix("<pre>")
        .and_then(|s| s.strip_suffix("</pre>"))
        .ok_or_else(|| ObslocError::ObsCodesParseError("missing <pre> block".to_string()))?;

    let mut sites = GroundSiteMap::new();
    for line in table.lines().skip(2) {
        let line = line.trim();
        let Some((code, remain)) = line.split_at_checked(3) else {
            continue;
        };
        if let Some(vector) = parse_parallax(remain) {
            sites.insert(code.to_string(), vector);
        }
    }

    sites.insert(GEOCENTER.to_string(), Vector3::zeros());
    Ok(sites)
}

fn parse_f64(s: &str, slice: std::ops::Range<usize>) -> Option<f64> {
    s.get(slice)?.trim().parse().ok()
}

/// Longitude and parallax factors of one fixed-width row, as a km vector.
/// `None` when any of the three numeric fields is blank or malformed.
fn parse_parallax(remain: &str) -> Option<Vector3<f64>> {
    let longitude = parse_f64(remain, 1..10)?;
    let rho_cos_phi = parse_f64(remain, 10..18)?;
    let rho_sin_phi = parse_f64(remain, 18..27)?;

    let lambda = longitude * RADEG;
    Some(
        Vector3::new(
            rho_cos_phi * lambda.cos(),
            rho_cos_phi * lambda.sin(),
            rho_sin_phi,
        ) * EARTH_RADIUS_KM,
    )
}
