//! Shared test fixtures: a scripted ephemeris engine and staging helpers.
//!
//! The mock engine stands in for the external evaluation library. Its kernel working set is
//! per-instance, so every test case gets a fresh, isolated "process-global" state by building
//! a new mock.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use nalgebra::{Matrix3, Vector3};

use obsloc::constants::SECONDS_PER_DAY;
use obsloc::engine::EphemerisEngine;
use obsloc::kernel::KernelSpecifier;
use obsloc::obsloc_errors::ObslocError;

/// J2000 epoch as a Julian date, used by the mock time conversion.
pub const JD_J2000: f64 = 2_451_545.0;

pub struct MockEngine {
    /// How many initial `load_kernels` calls should be refused.
    fail_first_loads: Cell<usize>,
    /// Every kernel set handed to the engine, in call order.
    pub loads: RefCell<Vec<Vec<Utf8PathBuf>>>,
    /// Scripted `(positions km, light times s)` per target id.
    results: HashMap<String, (Vec<Vector3<f64>>, Vec<f64>)>,
    /// Rotation returned by every `frame_transform` call.
    rotation: Matrix3<f64>,
    /// Number of `frame_transform` calls observed.
    pub frame_transforms: Cell<usize>,
}

impl MockEngine {
    pub fn new() -> Self {
        MockEngine {
            fail_first_loads: Cell::new(0),
            loads: RefCell::new(Vec::new()),
            results: HashMap::new(),
            rotation: Matrix3::identity(),
            frame_transforms: Cell::new(0),
        }
    }

    pub fn failing_loads(self, n: usize) -> Self {
        self.fail_first_loads.set(n);
        self
    }

    pub fn with_result(
        mut self,
        target: &str,
        positions_km: Vec<Vector3<f64>>,
        light_times_s: Vec<f64>,
    ) -> Self {
        self.results
            .insert(target.to_string(), (positions_km, light_times_s));
        self
    }

    pub fn with_rotation(mut self, rotation: Matrix3<f64>) -> Self {
        self.rotation = rotation;
        self
    }
}

impl EphemerisEngine for MockEngine {
    fn load_kernels(&self, paths: &[Utf8PathBuf]) -> Result<(), ObslocError> {
        self.loads.borrow_mut().push(paths.to_vec());
        let remaining = self.fail_first_loads.get();
        if remaining > 0 {
            self.fail_first_loads.set(remaining - 1);
            return Err(ObslocError::EngineError(
                "no loaded kernels cover the request".to_string(),
            ));
        }
        Ok(())
    }

    fn position(
        &self,
        target: &str,
        _epochs: &[f64],
        _frame: &str,
        _abcorr: &str,
        _center: &str,
    ) -> Result<(Vec<Vector3<f64>>, Vec<f64>), ObslocError> {
        self.results
            .get(target)
            .cloned()
            .ok_or_else(|| ObslocError::EngineError(format!("no scripted state for {target}")))
    }

    fn frame_transform(
        &self,
        _from_frame: &str,
        _to_frame: &str,
        _epoch: f64,
    ) -> Result<Matrix3<f64>, ObslocError> {
        self.frame_transforms.set(self.frame_transforms.get() + 1);
        Ok(self.rotation)
    }

    fn utc_jd_to_epoch(&self, jd_utc: f64) -> Result<f64, ObslocError> {
        Ok((jd_utc - JD_J2000) * SECONDS_PER_DAY)
    }
}

/// A specifier whose downloads can never succeed (closed local port), for offline tests.
pub fn unreachable_specifier(site_id: &str, name: &str, files: &[&str]) -> KernelSpecifier {
    let urls = files
        .iter()
        .map(|f| format!("http://127.0.0.1:9/kernels/{f}"))
        .collect();
    KernelSpecifier::new(site_id, name, urls, vec![], vec![]).unwrap()
}

/// Create empty placeholder files under `dir`.
pub fn touch_all(dir: &Utf8Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), b"").unwrap();
    }
}

pub fn assert_close(actual: f64, expected: f64, rtol: f64) {
    let scale = expected.abs().max(f64::MIN_POSITIVE);
    assert!(
        (actual - expected).abs() <= rtol * scale,
        "not close enough: actual={actual}, expected={expected}"
    );
}
