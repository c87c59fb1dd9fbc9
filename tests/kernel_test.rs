//! Kernel loader orchestration: optimistic load, fetch-and-retry-once, fatal incompleteness.

mod common;

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use camino::Utf8Path;
use common::{touch_all, unreachable_specifier, MockEngine};

use obsloc::env_state::ObslocEnv;
use obsloc::kernel::staging::staging_dir;
use obsloc::kernel::{fetch::fetch, KernelLoader, KernelSpecifier};
use obsloc::obsloc_errors::ObslocError;

const FILES: [&str; 3] = ["naif0012.tls", "sat.tsc", "eph.bsp"];

/// Spawn a local HTTP stub answering every request with the same body.
///
/// Returns the base URL of the stub and a counter of the connections it served, so tests can
/// assert that a code path made no further network round-trips.
fn serve(body: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let served = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&served);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            counter.fetch_add(1, Ordering::SeqCst);
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (format!("http://{addr}/kernels/"), served)
}

#[test]
fn warm_cache_loads_without_fetch() {
    let env = ObslocEnv::new();
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    let spec = unreachable_specifier("-95", "TESS", &FILES);
    touch_all(&staging_dir(root, &spec).unwrap(), &FILES);

    let engine = MockEngine::new();
    let loader = KernelLoader::new(&env, root);
    let paths = loader.load(&spec, &engine).unwrap();

    // one optimistic load, no retry
    assert_eq!(engine.loads.borrow().len(), 1);
    // declared order is preserved for the engine's override semantics
    let expected: Vec<_> = FILES.iter().map(|f| root.join("-95").join(f)).collect();
    assert_eq!(paths, expected);
}

#[test]
fn cold_engine_triggers_fetch_and_one_retry() {
    let env = ObslocEnv::new();
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    let spec = unreachable_specifier("-95", "TESS", &FILES);
    // downloads all fail (closed port) but the files are already present,
    // so the post-fetch completeness check passes
    touch_all(&staging_dir(root, &spec).unwrap(), &FILES);

    let engine = MockEngine::new().failing_loads(1);
    let loader = KernelLoader::new(&env, root);
    assert!(loader.load(&spec, &engine).is_ok());
    assert_eq!(engine.loads.borrow().len(), 2);
}

#[test]
fn second_engine_refusal_is_fatal() {
    let env = ObslocEnv::new();
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    let spec = unreachable_specifier("-95", "TESS", &FILES);
    touch_all(&staging_dir(root, &spec).unwrap(), &FILES);

    let engine = MockEngine::new().failing_loads(2);
    let loader = KernelLoader::new(&env, root);
    let err = loader.load(&spec, &engine).unwrap_err();

    assert!(matches!(err, ObslocError::EngineError(_)));
    // exactly one retry, never more
    assert_eq!(engine.loads.borrow().len(), 2);
}

#[test]
fn incomplete_set_after_fetch_aborts_the_operation() {
    let env = ObslocEnv::new();
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    // nothing staged, downloads all fail
    let spec = unreachable_specifier("-95", "TESS", &FILES);

    let engine = MockEngine::new().failing_loads(1);
    let loader = KernelLoader::new(&env, root);
    let err = loader.load(&spec, &engine).unwrap_err();

    match err {
        ObslocError::IncompleteKernelSet { site, missing } => {
            assert_eq!(site, "-95");
            assert_eq!(missing.len(), FILES.len());
        }
        other => panic!("expected IncompleteKernelSet, got {other:?}"),
    }
    // the retry load never happened
    assert_eq!(engine.loads.borrow().len(), 1);
}

#[test]
fn fetch_reports_every_missing_file() {
    let env = ObslocEnv::new();
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    let spec = unreachable_specifier("-227", "K2", &FILES);
    let dir = staging_dir(root, &spec).unwrap();
    // one of three present: still incomplete, still fatal
    touch_all(&dir, &FILES[..1]);

    match fetch(&env, &spec, &dir).unwrap_err() {
        ObslocError::IncompleteKernelSet { missing, .. } => {
            assert_eq!(missing.len(), 2);
        }
        other => panic!("expected IncompleteKernelSet, got {other:?}"),
    }
    assert!(!spec.is_complete(&env, &dir).unwrap());
}

#[test]
fn wildcard_fetch_round_trip_reports_complete() {
    let env = ObslocEnv::new();
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    // the stub answers every GET with this listing, so wildcard matches download as
    // small HTML-bodied placeholder files
    const LISTING: &str = concat!(
        r#"<html><body><a href="../">up</a>"#,
        r#"<a href="TESS_EPH_DEF_2018004_01.bsp">definitive</a>"#,
        r#"<a href="unrelated.txt">other</a></body></html>"#,
    );
    let (base, served) = serve(LISTING);

    let spec = KernelSpecifier::new(
        "-95",
        "TESS",
        vec![format!("{base}naif0012.tls")],
        vec![(base.clone(), "TESS_EPH_DEF*".to_string())],
        vec![],
    )
    .unwrap();
    let dir = staging_dir(root, &spec).unwrap();

    fetch(&env, &spec, &dir).unwrap();

    assert!(spec.is_complete(&env, &dir).unwrap());
    assert!(dir.join("naif0012.tls").is_file());
    assert!(dir.join("TESS_EPH_DEF_2018004_01.bsp").is_file());
    assert!(!dir.join("unrelated.txt").exists());

    // explicit file first, wildcard matches after
    let expected = spec.expected_local_paths(&env, &dir).unwrap();
    assert_eq!(
        expected,
        vec![
            dir.join("naif0012.tls"),
            dir.join("TESS_EPH_DEF_2018004_01.bsp"),
        ]
    );

    // the remote set was snapshotted: further presence checks stay off the network
    let connections_after_fetch = served.load(Ordering::SeqCst);
    assert!(spec.is_complete(&env, &dir).unwrap());
    assert!(spec.is_complete(&env, &dir).unwrap());
    assert_eq!(served.load(Ordering::SeqCst), connections_after_fetch);
}

#[test]
fn interrupted_download_remnant_never_counts_as_present() {
    let env = ObslocEnv::new();
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    let spec = unreachable_specifier("-95", "TESS", &FILES);
    let dir = staging_dir(root, &spec).unwrap();
    // an interrupted stream only ever leaves the in-progress name behind
    std::fs::write(dir.join("naif0012.tls.part"), b"truncated").unwrap();

    assert!(!spec.is_complete(&env, &dir).unwrap());
    assert_eq!(
        spec.missing_local_paths(&env, &dir).unwrap().len(),
        FILES.len()
    );
    match fetch(&env, &spec, &dir).unwrap_err() {
        ObslocError::IncompleteKernelSet { missing, .. } => {
            assert_eq!(missing.len(), FILES.len());
        }
        other => panic!("expected IncompleteKernelSet, got {other:?}"),
    }
}

/// Full round trip against the NAIF archive: explicit files only, small kernels.
#[test]
#[ignore = "requires network access"]
fn fetch_round_trip_reports_complete() {
    let env = ObslocEnv::new();
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(tmp.path()).unwrap();

    let spec = KernelSpecifier::new(
        "-82",
        "CASSINI",
        vec![
            "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/lsk/a_old_versions/naif0009.tls"
                .to_string(),
            "https://naif.jpl.nasa.gov/pub/naif/CASSINI/kernels/sclk/cas00084.tsc".to_string(),
        ],
        vec![],
        vec![],
    )
    .unwrap();

    let dir = staging_dir(root, &spec).unwrap();
    assert!(!spec.is_complete(&env, &dir).unwrap());
    fetch(&env, &spec, &dir).unwrap();
    assert!(spec.is_complete(&env, &dir).unwrap());
}
