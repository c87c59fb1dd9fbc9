use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObslocError {
    #[error("Invalid wildcard pattern (more than one '*'): {0}")]
    InvalidWildcardPattern(String),

    #[error("Kernel specifier for {0} declares no explicit files")]
    EmptyKernelSpecifier(String),

    #[error("Time-critical file {1} of {0} is not one of its explicit files")]
    TimeCriticalNotExplicit(String, String),

    #[error("Kernel set for {site} incomplete after fetch; missing: {missing:?}")]
    IncompleteKernelSet {
        site: String,
        missing: Vec<Utf8PathBuf>,
    },

    #[error("Invalid site identifier (expected 3-4 characters): {0}")]
    InvalidSiteId(String),

    #[error("Invalid Julian date (expected 7 digits before the decimal point): {0}")]
    InvalidJulianDate(f64),

    #[error("Ephemeris engine error: {0}")]
    EngineError(String),

    #[error("Invalid URL (no file name component): {0}")]
    InvalidUrl(String),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse MPC observatory table: {0}")]
    ObsCodesParseError(String),
}

impl PartialEq for ObslocError {
    fn eq(&self, other: &Self) -> bool {
        use ObslocError::*;
        match (self, other) {
            (InvalidWildcardPattern(a), InvalidWildcardPattern(b)) => a == b,
            (EmptyKernelSpecifier(a), EmptyKernelSpecifier(b)) => a == b,
            (TimeCriticalNotExplicit(a, c), TimeCriticalNotExplicit(b, d)) => a == b && c == d,
            (
                IncompleteKernelSet { site: a, missing: c },
                IncompleteKernelSet { site: b, missing: d },
            ) => a == b && c == d,
            (InvalidSiteId(a), InvalidSiteId(b)) => a == b,
            (InvalidJulianDate(a), InvalidJulianDate(b)) => a == b,
            (EngineError(a), EngineError(b)) => a == b,
            (InvalidUrl(a), InvalidUrl(b)) => a == b,
            (ObsCodesParseError(a), ObsCodesParseError(b)) => a == b,

            // Transport/filesystem errors compare by variant only
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (ReqwestError(_), ReqwestError(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
