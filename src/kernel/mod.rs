//! # Kernel acquisition and staleness management
//!
//! Everything between "this site needs kernels" and "the engine has them loaded" lives here:
//! deciding which files a site requires ([`specifier`]), where they live locally ([`staging`]),
//! fetching
//! the missing ones including wildcard-expanded directory listings ([`fetch`]), refreshing
//! time-critical files that go stale ([`staleness`]), and orchestrating the whole thing into a
//! loaded engine working set ([`loader`]).
//!
//! Error policy, in one place:
//!
//! - malformed wildcard pattern → fatal configuration error, immediate;
//! - single-file download failure → logged and skipped, the aggregate completeness check
//!   afterwards decides;
//! - kernel set still incomplete after one fetch pass → fatal, no retry/backoff;
//! - stale time-critical file that fails to refresh → logged, the stale copy stays usable.

pub mod fetch;
pub mod loader;
pub mod specifier;
pub mod staging;
pub mod staleness;

pub use loader::KernelLoader;
pub use specifier::KernelSpecifier;
