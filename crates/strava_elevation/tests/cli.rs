use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEGMENT: &str = "30408380";

/// Run the built binary inside `cwd` against `base_url`, with the token
/// taken only from `token` so the caller's environment cannot leak in.
async fn run_bin(cwd: &Path, base_url: &str, token: Option<&str>, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_strava_elevation"));
    cmd.current_dir(cwd)
        .args(args)
        .env("STRAVA_BASE_URL", base_url)
        .env("STRAVA_ELEVATION_LOG_LEVEL", "warn")
        .env_remove("STRAVA_ACCESS_TOKEN");
    if let Some(t) = token {
        cmd.env("STRAVA_ACCESS_TOKEN", t);
    }
    cmd.output().await.expect("spawn strava_elevation")
}

async fn mount_streams(server: &MockServer, segment: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/segments/{segment}/streams")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn writes_profile_for_default_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/segments/{SEGMENT}/streams")))
        .and(query_param("keys", "altitude,distance"))
        .and(query_param("resolution", "medium"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"type": "distance", "data": [0, 10, 20]},
            {"type": "altitude", "data": [100, 105, 110]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_bin(dir.path(), &server.uri(), Some("tok"), &[]).await;
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let csv = std::fs::read_to_string(dir.path().join("elevation_profile.csv")).expect("csv");
    assert_eq!(csv, "distance_m,altitude_m\n0,100\n10,105\n20,110\n");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("elevation_profile.csv"));
    assert!(stdout.contains(SEGMENT));
}

#[tokio::test]
async fn missing_token_exits_nonzero_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_bin(dir.path(), &server.uri(), None, &[]).await;
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("STRAVA_ACCESS_TOKEN"));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(!dir.path().join("elevation_profile.csv").exists());
}

#[tokio::test]
async fn http_failure_reports_status_and_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/segments/{SEGMENT}/streams")))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization Error"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_bin(dir.path(), &server.uri(), Some("bad"), &[]).await;
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("401"));
    assert!(stdout.contains("Authorization Error"));
    assert!(stdout.contains("Failed to retrieve elevation data."));
    assert!(!dir.path().join("elevation_profile.csv").exists());
}

#[tokio::test]
async fn missing_altitude_writes_nothing() {
    let server = MockServer::start().await;
    mount_streams(
        &server,
        SEGMENT,
        serde_json::json!([{"type": "distance", "data": [0, 10, 20]}]),
    )
    .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_bin(dir.path(), &server.uri(), Some("tok"), &[]).await;
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stdout.contains("Failed to retrieve elevation data."));
    assert_eq!(
        stderr.matches("Altitude data not found in the response.").count(),
        1
    );
    assert!(!stdout.contains("data not found"));
    assert!(!dir.path().join("elevation_profile.csv").exists());
}

#[tokio::test]
async fn length_mismatch_warns_and_truncates() {
    let server = MockServer::start().await;
    mount_streams(
        &server,
        "555",
        serde_json::json!([
            {"type": "distance", "data": [0, 1, 2, 3, 4]},
            {"type": "altitude", "data": [10, 11, 12]}
        ]),
    )
    .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_bin(
        dir.path(),
        &server.uri(),
        Some("tok"),
        &["555", "--output", "short.csv"],
    )
    .await;
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stdout.contains("saved to"));
    // the mismatch is reported once, on the log channel
    assert_eq!(stderr.matches("different lengths").count(), 1);
    assert!(stderr.contains("(5 vs 3)"));
    assert!(!stdout.contains("different lengths"));

    let csv = std::fs::read_to_string(dir.path().join("short.csv")).expect("csv");
    assert_eq!(csv.lines().count(), 4);
    assert_eq!(csv, "distance_m,altitude_m\n0,10\n1,11\n2,12\n");
}

#[tokio::test]
async fn empty_streams_write_nothing() {
    let server = MockServer::start().await;
    mount_streams(
        &server,
        SEGMENT,
        serde_json::json!([
            {"type": "altitude", "data": []},
            {"type": "distance", "data": []}
        ]),
    )
    .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_bin(dir.path(), &server.uri(), Some("tok"), &[]).await;
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Failed to retrieve elevation data."));
    assert!(!dir.path().join("elevation_profile.csv").exists());
}

#[tokio::test]
async fn token_can_come_from_env_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/segments/9/streams"))
        .and(header("authorization", "Bearer from-file"))
        .and(query_param("resolution", "low"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"type": "altitude", "data": [1.5]},
            {"type": "distance", "data": [0.0]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("strava.env"), "STRAVA_ACCESS_TOKEN=from-file\n")
        .expect("env file");
    let out = run_bin(
        dir.path(),
        &server.uri(),
        None,
        &["9", "--env-file", "strava.env", "--resolution", "low"],
    )
    .await;
    assert!(out.status.success(), "stdout: {}", String::from_utf8_lossy(&out.stdout));
    let csv = std::fs::read_to_string(dir.path().join("elevation_profile.csv")).expect("csv");
    assert_eq!(csv, "distance_m,altitude_m\n0.0,1.5\n");
}

#[tokio::test]
async fn unwritable_output_exits_nonzero() {
    let server = MockServer::start().await;
    mount_streams(
        &server,
        SEGMENT,
        serde_json::json!([
            {"type": "distance", "data": [0]},
            {"type": "altitude", "data": [1]}
        ]),
    )
    .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_bin(
        dir.path(),
        &server.uri(),
        Some("tok"),
        &["--output", "missing-dir/profile.csv"],
    )
    .await;
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing-dir"));
}
