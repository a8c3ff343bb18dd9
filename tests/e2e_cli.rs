//! CLI end-to-end tests
//!
//! Tests for the availarr command-line interface. None of these reach the
//! internet; list lookups go to a local mock server.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the availarr binary
#[allow(deprecated)]
fn availarr_cmd() -> Command {
    Command::cargo_bin("availarr").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = availarr_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = availarr_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("availarr"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("lists"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = availarr_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_validate_valid_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[justwatch]
country = "US"

[[libraries]]
name = "Movies"
media_type = "movie"

[libraries.exclude.justwatch]
available_on = ["netflix"]
"#,
    )
    .unwrap();

    let mut cmd = availarr_cmd();
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Movies (movie)"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[[libraries]]
name = "Movies"
media_type = "movie"

[libraries.exclude.justwatch]
available_on = ["netflix"]
not_available_on = ["hulu"]
"#,
    )
    .unwrap();

    let mut cmd = availarr_cmd();
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn test_cli_check_rejects_unknown_media_type() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[justwatch]\ncountry = \"US\"\n").unwrap();

    let mut cmd = availarr_cmd();
    cmd.args(["--config"])
        .arg(&path)
        .args(["check", "Dune", "--year", "2021", "--media-type", "anime"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid media type"));
}

#[test]
fn test_cli_lists_requires_mdblist_section() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[justwatch]\ncountry = \"US\"\n").unwrap();

    let mut cmd = availarr_cmd();
    cmd.args(["--config"])
        .arg(&path)
        .args(["lists", "--media-type", "movie"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[mdblist] is not configured"));
}

#[test]
fn test_cli_providers_rejects_bad_sample() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[justwatch]\ncountry = \"US\"\n").unwrap();

    let mut cmd = availarr_cmd();
    cmd.args(["--config"])
        .arg(&path)
        .args(["providers", "Loki"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected TITLE:YEAR"));
}

#[tokio::test]
async fn test_cli_lists_uses_each_library_media_type() {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/movies/items/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 603, "title": "The Matrix" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lists/bob/shows/items/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shows": [{ "tvdb_id": 81189, "title": "Breaking Bad" }]
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[mdblist]
api_key = "k"
base_url = "{}"

[[libraries]]
name = "Movies"
media_type = "movie"

[libraries.exclude.mdblist]
lists = ["https://mdblist.com/lists/alice/movies"]

[[libraries]]
name = "TV"
media_type = "show"

[libraries.exclude.mdblist]
lists = ["https://mdblist.com/lists/bob/shows"]
"#,
            server.uri()
        ),
    )
    .unwrap();

    let output = tokio::task::spawn_blocking(move || {
        availarr_cmd()
            .arg("--config")
            .arg(&config_path)
            .arg("lists")
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Movies (movie)"));
    assert!(stdout.contains("603\tThe Matrix\thttps://mdblist.com/lists/alice/movies"));
    assert!(stdout.contains("# TV (show)"));
    assert!(stdout.contains("81189\tBreaking Bad\thttps://mdblist.com/lists/bob/shows"));
}
