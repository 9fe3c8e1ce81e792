//! End-to-end tests for the agency-desk binary.
//!
//! Nothing here needs a live backend: commands either work offline or fail
//! before the first request.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A desk command isolated from the caller's environment and home config.
fn desk(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("agency-desk");
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env_remove("AGENCY_BASE_API")
        .env_remove("AGENCY_API_TOKEN")
        .env_remove("AGENCY_LOG");
    cmd
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("tasks"))
            .stdout(predicate::str::contains("docs"));
    }

    #[test]
    fn test_version() {
        let dir = TempDir::new().unwrap();
        desk(&dir).arg("--version").assert().success();
    }

    #[test]
    fn test_whoami_without_token_fails() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args(["--base-api", "http://127.0.0.1:9", "whoami"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not signed in"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args(["--base-api", "localhost:8000", "jobs"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid base URL"));
    }

    #[test]
    fn test_tasks_rejects_unsupported_page_size() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args(["--base-api", "http://127.0.0.1:9", "tasks", "--per-page", "10"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("page size must be one of [12, 24, 48, 96]"));
    }
}

// =============================================================================
// Config Tests
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_show_defaults() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No desk.toml found"))
            .stdout(predicate::str::contains("items_per_page = 12"));
    }

    #[test]
    fn test_config_init_creates_toml() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created desk.toml"));

        let path = dir.path().join(".agency/desk.toml");
        assert!(path.exists());
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("[api]"));
        assert!(content.contains("currency = \"ZAR\""));
    }

    #[test]
    fn test_config_init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        desk(&dir).args(["config", "init"]).assert().success();
        desk(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));
    }

    #[test]
    fn test_config_validate_reports_warnings() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".agency")).unwrap();
        fs::write(
            dir.path().join(".agency/desk.toml"),
            "[api]\nbase_url = \"http://agency.example\"\n\n[ui]\nitems_per_page = 10\n",
        )
        .unwrap();

        desk(&dir)
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("not HTTPS"))
            .stdout(predicate::str::contains("items_per_page 10"));
    }

    #[test]
    fn test_env_overrides_file_in_show() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .env("AGENCY_BASE_API", "http://localhost:8000/")
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "base_url = \"http://localhost:8000\"",
            ));
    }

    #[test]
    fn test_work_dir_flag_locates_config() {
        let dir = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        desk(&dir)
            .args(["config", "init", "--work-dir"])
            .arg(project.path())
            .assert()
            .success();
        assert!(project.path().join(".agency/desk.toml").exists());
    }
}

// =============================================================================
// Price Tests
// =============================================================================

mod price {
    use super::*;

    #[test]
    fn test_convert_rand_to_dollars() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args(["price", "convert", "10000", "--to", "usd"])
            .assert()
            .success()
            .stdout("$550.00\n");
    }

    #[test]
    fn test_format_groups_thousands() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args(["price", "format", "1234.5"])
            .assert()
            .success()
            .stdout("R1,234.50\n");
    }

    #[test]
    fn test_parse_json_output() {
        let dir = TempDir::new().unwrap();
        let output = desk(&dir)
            .args(["--output", "json", "price", "parse", "From R5,000 - R10,000"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["amount"], 5000.0);
    }

    #[test]
    fn test_unknown_currency_fails() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args(["price", "convert", "100", "--to", "JPY"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("expected one of"));
    }
}

// =============================================================================
// Form validation Tests
// =============================================================================

mod forms {
    use super::*;

    #[test]
    fn test_contact_with_bad_email_fails_before_sending() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args([
                "--base-api",
                "http://127.0.0.1:9",
                "contact",
                "--name",
                "Thandi",
                "--email",
                "not-an-email",
                "--message",
                "Hello there",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("valid email address"));
    }

    #[test]
    fn test_reset_with_mismatched_passwords_fails() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args([
                "--base-api",
                "http://127.0.0.1:9",
                "password",
                "reset",
                "--uid",
                "MQ",
                "--reset-token",
                "abc-123",
                "--password",
                "correct-horse",
                "--confirm",
                "battery-staple",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid input"));
    }

    #[test]
    fn test_job_application_requires_a_name() {
        let dir = TempDir::new().unwrap();
        desk(&dir)
            .args([
                "--base-api",
                "http://127.0.0.1:9",
                "jobs",
                "apply",
                "4",
                "--name",
                " ",
                "--email",
                "lerato@example.com",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to submit application"));
    }
}
