//! # obsloc – where is the observer?
//!
//! `obsloc` resolves the position of an observing site (a ground-based observatory or an
//! artificial-satellite mission) at given epochs, in a chosen reference frame and center.
//! It does so by managing the acquisition and staleness of externally supplied ephemeris
//! kernel files (what does this site need, is it already staged locally and complete, fetch
//! what is missing, refresh what went stale) and delegating every numerical evaluation to an
//! injected [`engine::EphemerisEngine`] capability.
//!
//! The crate intentionally implements **no orbital mechanics and no frame-rotation math**:
//! position, light time and frame transforms come from the engine; this crate's job is to make
//! sure the engine has the right kernels loaded, in the right order, and to convert units.
//!
//! Entry point: [`obsloc::Obsloc::locate`].

pub mod constants;
pub mod engine;
pub mod env_state;
pub mod kernel;
pub mod obsloc;
pub mod obsloc_errors;
pub mod query;
pub mod sites;
