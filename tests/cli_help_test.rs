#[cfg(test)]
mod cli_help_tests {
    use assert_cmd::prelude::*;
    use predicates::prelude::*;
    use std::process::Command;
    use tempfile::TempDir;

    /// A `nexus3` invocation isolated from the user's configuration and environment.
    fn nexus3(config_dir: &TempDir) -> Command {
        let mut cmd = Command::cargo_bin("nexus3").unwrap();
        cmd.env_clear()
            .env("NEXUS3_CONFIG", config_dir.path().join("nexus-cli"))
            .env("NEXUS3_URL", "http://127.0.0.1:9")
            .env("RUST_LOG", "off");
        cmd
    }

    #[test]
    fn test_cli_help_output() {
        let config_dir = TempDir::new().unwrap();
        let assert_result = nexus3(&config_dir).arg("--help").assert().success();
        let output = assert_result.get_output();
        let help_output = String::from_utf8_lossy(&output.stdout);

        assert!(help_output.contains("Usage:"));
        assert!(help_output.contains("Commands:"));

        for command in [
            "login",
            "list",
            "delete",
            "upload",
            "download",
            "repository",
            "cleanup-policy",
            "script",
            "security",
        ] {
            assert!(help_output.contains(command), "missing {}", command);
        }

        assert!(help_output.contains("--verbose"));
        assert!(help_output.contains("--config"));
        assert!(help_output.contains("-V, --version"));
    }

    #[test]
    fn test_cli_version_output() {
        let config_dir = TempDir::new().unwrap();
        nexus3(&config_dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("nexus3"))
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_abbreviated_subcommand_help() {
        let config_dir = TempDir::new().unwrap();
        nexus3(&config_dir)
            .args(["repo", "cr", "ho", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("apt"))
            .stdout(predicate::str::contains("maven"))
            .stdout(predicate::str::contains("recipe"));
    }

    #[test]
    fn test_unknown_command_is_usage_error() {
        let config_dir = TempDir::new().unwrap();
        nexus3(&config_dir)
            .arg("frobnicate")
            .assert()
            .code(64)
            .stderr(predicate::str::contains("Unknown command 'frobnicate'"));
    }

    #[test]
    fn test_ambiguous_command_is_usage_error() {
        let config_dir = TempDir::new().unwrap();
        nexus3(&config_dir)
            .args(["d", "repo/path", "local"])
            .assert()
            .code(64)
            .stderr(predicate::str::contains("ambiguous"))
            .stderr(predicate::str::contains("delete"))
            .stderr(predicate::str::contains("download"));
    }

    #[test]
    fn test_missing_argument_is_usage_error() {
        let config_dir = TempDir::new().unwrap();
        nexus3(&config_dir)
            .args(["upload", "only-source"])
            .assert()
            .code(64);
    }

    #[test]
    fn test_script_commands_fail_when_groovy_disabled() {
        let config_dir = TempDir::new().unwrap();
        let script = config_dir.path().join("dummy.groovy");
        std::fs::write(&script, "log.info('hello')").unwrap();

        let invocations: Vec<Vec<String>> = vec![
            vec!["script".into(), "run".into(), "dummy".into()],
            vec![
                "script".into(),
                "create".into(),
                "dummy".into(),
                script.display().to_string(),
            ],
            vec!["script".into(), "del".into(), "dummy".into()],
            vec!["script".into(), "ls".into()],
        ];

        for args in invocations {
            nexus3(&config_dir)
                .env("NEXUS3_GROOVY_ENABLED", "False")
                .args(&args)
                .assert()
                .code(78)
                .stderr(predicate::str::contains("groovy_enabled is false"));
        }
    }

    #[test]
    fn test_invalid_boolean_environment_value() {
        let config_dir = TempDir::new().unwrap();
        nexus3(&config_dir)
            .env("NEXUS3_X509_VERIFY", "maybe")
            .args(["repository", "list"])
            .assert()
            .code(78)
            .stderr(predicate::str::contains("NEXUS3_X509_VERIFY"));
    }

    #[test]
    fn test_repository_delete_requires_confirmation() {
        let config_dir = TempDir::new().unwrap();
        nexus3(&config_dir)
            .args(["repository", "delete", "maven-releases"])
            .assert()
            .code(64)
            .stderr(predicate::str::contains("--yes"));
    }
}
