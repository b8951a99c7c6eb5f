//! Integration tests for d6bridge
//!
//! Every command runs against a temp state dir and a config path that does
//! not exist, with D6 credentials removed, so nothing touches the network.

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use serde_json::Value;
    use tempfile::TempDir;

    const D6_VARS: [&str; 8] = [
        "D6_API_BASE_URL",
        "D6_API_USERNAME",
        "D6_API_PASSWORD",
        "D6_REQUEST_TIMEOUT_SECS",
        "D6_ENABLE_MOCK_DATA",
        "D6_USE_MOCK_DATA_FIRST",
        "D6_CACHE_BACKEND",
        "D6BRIDGE_CONFIG",
    ];

    /// Sandbox mode, memory cache, isolated state
    fn d6bridge(state: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("d6bridge");
        for var in D6_VARS {
            cmd.env_remove(var);
        }
        cmd.env("D6BRIDGE_STATE_DIR", state.path())
            .env("D6_USE_MOCK_DATA_FIRST", "true")
            .env("D6_CACHE_BACKEND", "memory")
            .arg("--config")
            .arg(state.path().join("config.toml"));
        cmd
    }

    fn stdout_json(output: &[u8]) -> Value {
        serde_json::from_slice(output).expect("stdout is JSON")
    }

    #[test]
    fn help_displays() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("D6 school data"));
    }

    #[test]
    fn version_displays() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("d6bridge"));
    }

    #[test]
    fn tools_plain_lists_every_tool() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .args(["tools", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("get_schools"))
            .stdout(predicate::str::contains("get_learner_marks"))
            .stdout(predicate::str::contains("get_lookup_data"));
    }

    #[test]
    fn tools_json_is_a_catalogue() {
        let state = TempDir::new().unwrap();
        let output = d6bridge(&state)
            .args(["tools", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let catalogue = stdout_json(&output.stdout);
        let tools = catalogue.as_array().unwrap();
        assert_eq!(tools.len(), 6);
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[test]
    fn call_learners_from_mock() {
        let state = TempDir::new().unwrap();
        let output = d6bridge(&state)
            .args([
                "call",
                "get_learners",
                "--params",
                r#"{"school_id": 1000, "limit": 5}"#,
            ])
            .output()
            .unwrap();
        assert!(output.status.success());

        let body = stdout_json(&output.stdout);
        assert_eq!(body["source"], "mock");
        let learners = body["data"].as_array().unwrap();
        assert_eq!(learners.len(), 5);
        assert!(learners.iter().all(|l| l["schoolId"] == 1000));
    }

    #[test]
    fn call_is_logged() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .args(["call", "get_schools"])
            .assert()
            .success();

        let log = std::fs::read_to_string(state.path().join("calls.log")).unwrap();
        let entry: Value = serde_json::from_str(log.trim()).unwrap();
        assert_eq!(entry["tool"], "get_schools");
        assert_eq!(entry["source"], "mock");
        assert!(entry["call_id"].is_string());
    }

    #[test]
    fn file_cache_persists_between_runs() {
        let state = TempDir::new().unwrap();
        let call = |state: &TempDir| {
            let output = d6bridge(state)
                .env("D6_CACHE_BACKEND", "file")
                .args(["call", "get_lookup_data", "--params", r#"{"type": "genders"}"#])
                .output()
                .unwrap();
            assert!(output.status.success());
            stdout_json(&output.stdout)
        };

        let first = call(&state);
        let second = call(&state);
        assert_eq!(first["source"], "mock");
        assert_eq!(second["source"], "cache");
        assert_eq!(first["data"], second["data"]);

        d6bridge(&state)
            .env("D6_CACHE_BACKEND", "file")
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 1 entries"));
    }

    #[test]
    fn call_unknown_tool() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .args(["call", "get_homework"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown tool: get_homework"))
            .stderr(predicate::str::contains("d6bridge tools"));
    }

    #[test]
    fn call_rejects_out_of_range_limit() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .args([
                "call",
                "get_learners",
                "--params",
                r#"{"school_id": 1000, "limit": 500}"#,
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("'limit' must be between 1 and 100"));
    }

    #[test]
    fn exhausted_without_credentials_or_mock() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .env("D6_USE_MOCK_DATA_FIRST", "false")
            .env("D6_ENABLE_MOCK_DATA", "false")
            .args(["call", "get_schools"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No source could serve schools"))
            .stderr(predicate::str::contains("D6_API_USERNAME"));
    }

    #[test]
    fn status_degraded_with_mock_only() {
        let state = TempDir::new().unwrap();
        let output = d6bridge(&state)
            .env("D6_USE_MOCK_DATA_FIRST", "false")
            .args(["status", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let snapshot = stdout_json(&output.stdout);
        assert_eq!(snapshot["status"], "degraded");
        assert_eq!(snapshot["mockDataAvailable"], true);
        assert_eq!(snapshot["availability"]["v2Available"], false);
        assert_eq!(snapshot["probeSource"], "mock");
    }

    #[test]
    fn probe_reports_unconfigured() {
        let state = TempDir::new().unwrap();
        let output = d6bridge(&state).args(["probe", "--json"]).output().unwrap();
        assert!(output.status.success());

        let report = stdout_json(&output.stdout);
        let versions = report["versions"].as_array().unwrap();
        assert_eq!(versions.len(), 2);
        assert!(versions.iter().all(|v| v["outcome"] == "unconfigured"));
    }

    #[test]
    fn config_path() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_masks_password() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .env("D6_API_PASSWORD", "hunter2")
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[upstream]"))
            .stdout(predicate::str::contains("hunter2").not());
    }

    #[test]
    fn config_init_then_set() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));

        d6bridge(&state)
            .args(["config", "set", "upstream.timeout_secs", "25"])
            .assert()
            .success();

        let written = std::fs::read_to_string(state.path().join("config.toml")).unwrap();
        assert!(written.contains("timeout_secs = 25"));
    }

    #[test]
    fn invalid_env_override_fails() {
        let state = TempDir::new().unwrap();
        d6bridge(&state)
            .env("D6_REQUEST_TIMEOUT_SECS", "soon")
            .args(["status"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("D6_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn cache_stats_json() {
        let state = TempDir::new().unwrap();
        let output = d6bridge(&state)
            .args(["cache", "stats", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        assert_eq!(stdout_json(&output.stdout)["backend"], "memory");
    }
}
