//! # Constants and type definitions for obsloc
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `obsloc` library.
//!
//! ## Overview
//!
//! - Unit conversions (AU ↔ km, days ↔ seconds)
//! - Core type aliases used across the crate
//! - Identifiers for the geocenter and the Earth body-fixed frame
//! - Kernel staleness threshold for time-critical files
//!
//! These definitions are used by the kernel-acquisition modules, the site tables, and the
//! position queries.

use nalgebra::Vector3;
use std::collections::HashMap;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Astronomical Unit in kilometers (IAU 2012 definition)
pub const AU_KM: f64 = 149_597_870.7;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Earth equatorial radius in kilometers, used to scale MPC parallax coordinates
pub const EARTH_RADIUS_KM: f64 = 6378.1363;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

// -------------------------------------------------------------------------------------------------
// Site and frame identifiers
// -------------------------------------------------------------------------------------------------

/// MPC code of the geocenter, the substitution target for excluded/unknown sites
pub const GEOCENTER: &str = "500";

/// NAIF id of the Earth, the body whose heliocentric state anchors ground queries
pub const EARTH_NAIF_ID: &str = "399";

/// Earth body-fixed frame in which the MPC site vectors are expressed
pub const BODY_FIXED_FRAME: &str = "ITRF93";

/// Sentinel display name marking a specifier whose files are staged in the shared
/// root directory rather than a per-site subdirectory
pub const GROUND_SENTINEL: &str = "GROUND";

/// Age (in days) beyond which a time-critical kernel is refreshed.
/// A file whose age is exactly at the threshold is still considered fresh.
pub const STALENESS_THRESHOLD_DAYS: f64 = 1.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Site/observatory code identifying an observing location (3–4 characters)
pub type SiteId = String;

/// Julian Date (days), interpreted as UTC on input
pub type JulianDate = f64;

/// Lookup table from ground-site code to its body-fixed geocentric vector in **km**
pub type GroundSiteMap = HashMap<SiteId, Vector3<f64>>;
