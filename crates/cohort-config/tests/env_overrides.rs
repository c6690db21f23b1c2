use cohort_config::CohortConfig;
use figment::Jail;

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.set_env("COHORT_DATABASE__PATH", ":memory:");
        jail.set_env("COHORT_WORKFLOW__TRANSACTION_TIMEOUT_MS", "2500");

        let config = CohortConfig::load().map_err(|e| e.to_string())?;
        assert!(config.database.is_in_memory());
        assert_eq!(config.workflow.transaction_timeout_ms, 2500);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        std::fs::create_dir_all(jail.directory().join(".cohort")).map_err(|e| e.to_string())?;
        jail.create_file(
            ".cohort/config.toml",
            r#"
[general]
default_limit = 10
"#,
        )?;
        jail.set_env("COHORT_GENERAL__DEFAULT_LIMIT", "3");

        let config = CohortConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.general.default_limit, 3);
        Ok(())
    });
}

#[test]
fn malformed_env_value_is_an_error() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.set_env("COHORT_DATABASE__BUSY_TIMEOUT_MS", "soon");

        assert!(CohortConfig::load().is_err());
        Ok(())
    });
}
