//! # Static satellite registry and shared ground-support specifier
//!
//! Enumerates the satellite missions the crate knows how to locate, each as a
//! [`KernelSpecifier`] pointing at its mission archive, plus the single shared specifier
//! covering every ground-based site (planetary ephemeris, leap seconds, Earth orientation).
//!
//! The kernel URL lists date from the missions' 2019-era archives and may lag the live
//! archives; wildcards absorb per-week ephemeris releases where the archive publishes them
//! (TESS definitive ephemerides).

use std::collections::{HashMap, HashSet};

use crate::constants::SiteId;
use crate::kernel::KernelSpecifier;

fn strings(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|s| s.to_string()).collect()
}

/// All satellite site ids with their kernel requirements.
pub(crate) fn satellite_registry() -> HashMap<SiteId, KernelSpecifier> {
    let tess = KernelSpecifier::new(
        "-95",
        "TESS",
        strings(&[
            "https://archive.stsci.edu/missions/tess/models/tess2018338154046-41240_naif0012.tls",
            "https://archive.stsci.edu/missions/tess/models/tess2018338154429-41241_de430.bsp",
        ]),
        vec![(
            "https://archive.stsci.edu/missions/tess/models/".to_string(),
            "TESS_EPH_DEF*".to_string(),
        )],
        vec![],
    )
    .expect("static TESS specifier is valid");

    let k2 = KernelSpecifier::new(
        "-227",
        "K2",
        strings(&[
            "https://archive.stsci.edu/pub/k2/spice/kplr2018134232543.tsc",
            "https://archive.stsci.edu/pub/k2/spice/naif0012.tls",
            "https://archive.stsci.edu/pub/k2/spice/spk_2018290000000_2018306220633_kplr.bsp",
        ]),
        vec![],
        vec![],
    )
    .expect("static K2 specifier is valid");

    let cassini = KernelSpecifier::new(
        "-82",
        "CASSINI",
        strings(&[
            "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/lsk/a_old_versions/naif0009.tls",
            "https://naif.jpl.nasa.gov/pub/naif/CASSINI/kernels/sclk/cas00084.tsc",
            "https://naif.jpl.nasa.gov/pub/naif/CASSINI/kernels/pck/cpck05Mar2004.tpc",
            "https://naif.jpl.nasa.gov/pub/naif/CASSINI/kernels/fk/release.11/cas_v37.tf",
            "https://naif.jpl.nasa.gov/pub/naif/CASSINI/kernels/ck/04135_04171pc_psiv2.bc",
            "https://naif.jpl.nasa.gov/pub/naif/CASSINI/kernels/spk/030201AP_SK_SM546_T45.bsp",
            "https://naif.jpl.nasa.gov/pub/naif/CASSINI/kernels/ik/release.11/cas_iss_v09.ti",
            "https://naif.jpl.nasa.gov/pub/naif/CASSINI/kernels/spk/020514_SE_SAT105.bsp",
            "https://naif.jpl.nasa.gov/pub/naif/CASSINI/kernels/spk/981005_PLTEPH-DE405S.bsp",
        ]),
        vec![],
        vec![],
    )
    .expect("static CASSINI specifier is valid");

    [tess, k2, cassini]
        .into_iter()
        .map(|spec| (spec.site_id.clone(), spec))
        .collect()
}

/// The single specifier shared by every ground-based site.
///
/// Load order matters: the engine gives precedence to later-loaded kernels, so Earth
/// orientation predicts come before the high-precision reconstruction. The reconstruction is
/// the time-critical member (NAIF republishes it daily).
pub(crate) fn ground_support_specifier() -> KernelSpecifier {
    KernelSpecifier::new(
        "GROUND",
        "GROUND",
        strings(&[
            "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/de430.bsp",
            "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/lsk/naif0012.tls",
            "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/pck/earth_200101_990628_predict.bpc",
            "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/pck/pck00010.tpc",
            "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/pck/earth_latest_high_prec.bpc",
        ]),
        vec![],
        strings(&[
            "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/pck/earth_latest_high_prec.bpc",
        ]),
    )
    .expect("static ground-support specifier is valid")
}

/// Site ids the crate refuses to handle (roving observer codes).
pub(crate) fn excluded_sites() -> HashSet<SiteId> {
    HashSet::from(["247".to_string()])
}
