//! # Site tables and classification
//!
//! An incoming site identifier belongs to exactly one of four categories, resolved once by
//! [`Obsloc::classify`](crate::obsloc::Obsloc::classify) and carried downstream as a
//! [`SiteCategory`] value, so no other component re-checks table membership.

pub mod ground;
pub mod satellites;

use nalgebra::Vector3;

use crate::kernel::KernelSpecifier;

/// The category an identifier resolved to, with the data its query path needs.
///
/// Classification order is fixed (ground table first, then satellites, then the excluded
/// set); an identifier present in more than one table resolves via the earlier category.
#[derive(Debug)]
pub enum SiteCategory<'a> {
    /// Ground observatory with its body-fixed geocentric vector in **km**.
    Ground(Vector3<f64>),
    /// Satellite mission with its kernel requirements.
    Satellite(&'a KernelSpecifier),
    /// Explicitly unsupported (e.g. roving observer codes).
    Excluded,
    /// Not present in any table.
    Unknown,
}
