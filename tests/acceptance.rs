//! Acceptance tests for the Allure Docker image
//!
//! These tests verify that the built image can:
//! 1. Generate an Allure report from the checked-in results fixture
//! 2. Serve the Allure UI and expose the expected behaviors tree
//! 3. Run `allure` and `java` at all
//!
//! Docker-backed tests are ignored by default; run them against a built
//! image with:
//!     ALLURE_IMAGE=allure-test:latest cargo test -- --ignored

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serial_test::serial;

use allure_image::harness::{checks, wait, Bind, Harness};
use allure_image::report::{self, REPORT_FILES};

/// Fixed host port for the serve test; serializes runs that use it
const SERVE_PORT: u16 = 8800;

/// The checked-in results fixture (three passing Selenium tests)
fn results_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("allure-results")
}

/// Connect to Docker; a missing daemon is an environment failure
fn harness() -> Harness {
    Harness::from_env().expect("Docker daemon not reachable")
}

#[test]
fn results_fixture_is_present() {
    let dir = results_dir();
    assert!(dir.exists(), "test results directory not found: {}", dir.display());

    let result_files: Vec<_> = fs::read_dir(&dir)
        .expect("failed to list results directory")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .collect();
    assert!(!result_files.is_empty(), "no test result files found");
}

#[tokio::test]
#[ignore = "requires a Docker daemon and the image under test"]
async fn allure_generate_produces_report() {
    let harness = harness();
    let report_dir = tempfile::tempdir().expect("failed to create report dir");

    harness
        .run_to_completion(
            &["allure", "generate", "/allure-results", "-o", "/allure-report", "--clean"],
            &[
                Bind::ro(results_dir(), "/allure-results"),
                Bind::rw(report_dir.path(), "/allure-report"),
            ],
        )
        .await
        .expect("allure generate failed");

    for file in REPORT_FILES {
        let path = report_dir.path().join(file);
        assert!(path.exists(), "report file {file} not generated");
        let len = fs::metadata(&path).expect("failed to stat report file").len();
        assert!(len > 0, "report file {file} is empty");
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon and the image under test"]
async fn allure_serve_answers_with_report_ui() {
    let harness = harness();

    let guard = harness
        .serve(
            &["allure", "serve", "-h", "0.0.0.0", "-p", "80", "/allure-results"],
            &[Bind::ro(results_dir(), "/allure-results")],
            SERVE_PORT,
            80,
        )
        .await
        .expect("failed to start serve container");

    let client = reqwest::Client::new();
    let outcome = serve_assertions(&client).await;

    // Teardown must run on every path; on failure the container logs are
    // attached to the panic message.
    match outcome {
        Ok(()) => guard.teardown().await,
        Err(msg) => {
            let logs = guard.logs().await;
            guard.teardown().await;
            panic!("allure serve check failed: {msg}\nContainer logs:\n{logs}");
        }
    }
}

/// All serve-side assertions, separated so the caller can always tear down
async fn serve_assertions(client: &reqwest::Client) -> Result<(), String> {
    let url = format!("http://localhost:{SERVE_PORT}");
    let body = wait::wait_for_http(client, &url, wait::PollConfig::default())
        .await
        .map_err(|e| e.to_string())?;

    let lowered = body.to_lowercase();
    if !body.contains("<!DOCTYPE html>") && !lowered.contains("<html") {
        return Err(format!("response is not an HTML page: {}", head(&body)));
    }
    if !lowered.contains("allure") {
        return Err(format!("response does not mention allure: {}", head(&body)));
    }

    // The behaviors data is optional at the HTTP level; when reachable it
    // must show the fixture's feature/story/suite structure.
    let behaviors_url = format!("{url}/data/behaviors.json");
    let Some(behaviors) = wait::try_get(client, &behaviors_url, Duration::from_secs(2)).await
    else {
        return Ok(());
    };

    let root = report::parse_behaviors(&behaviors).map_err(|e| e.to_string())?;
    if root.children.is_empty() {
        return Err("no behaviors found in report".to_string());
    }

    let feature = root.child(0).map_err(|e| e.to_string())?;
    if feature.name != "End-to-end test suit" {
        return Err(format!(
            "expected 'End-to-end test suit' feature, got '{}'",
            feature.name
        ));
    }

    let story = feature.child(0).map_err(|e| e.to_string())?;
    if story.name != "Selenium" {
        return Err(format!("expected 'Selenium' story, got '{}'", story.name));
    }

    let suite = story.child(0).map_err(|e| e.to_string())?;
    if suite.name != "Test selenium grid is alive" {
        return Err(format!(
            "expected 'Test selenium grid is alive' suite, got '{}'",
            suite.name
        ));
    }

    if suite.children.len() != 3 {
        return Err(format!(
            "expected 3 tests in suite, got {}",
            suite.children.len()
        ));
    }
    let names = suite.child_names();
    if !names.iter().all(|n| n.starts_with("test_selenium[Browser:")) {
        return Err(format!("unexpected test names: {names:?}"));
    }

    Ok(())
}

fn head(body: &str) -> String {
    body.chars().take(200).collect()
}

#[tokio::test]
#[ignore = "requires a Docker daemon and the image under test"]
async fn allure_version_is_reported() {
    let version = checks::allure_version(&harness())
        .await
        .expect("allure --version check failed");
    assert!(!version.is_empty());
}

#[tokio::test]
#[ignore = "requires a Docker daemon and the image under test"]
async fn java_is_available() {
    let banner = checks::java_version(&harness())
        .await
        .expect("java -version check failed");
    assert!(!banner.is_empty());
}
