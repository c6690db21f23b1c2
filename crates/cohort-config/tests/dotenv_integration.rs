//! Integration tests proving values from a `.env` file flow through figment.
//!
//! `dotenvy` writes into the real process environment, so each test here uses
//! a different key.

use cohort_config::CohortConfig;
use figment::Jail;

#[test]
fn dotenv_values_reach_config() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.create_file(".env", "COHORT_DATABASE__PATH=from-dotenv.db\n")?;

        let config = CohortConfig::load_with_dotenv().map_err(|e| e.to_string())?;
        assert_eq!(config.database.path, "from-dotenv.db");
        Ok(())
    });
}

#[test]
fn process_env_beats_dotenv() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.set_env("COHORT_GENERAL__DEFAULT_LIMIT", "7");
        jail.create_file(".env", "COHORT_GENERAL__DEFAULT_LIMIT=99\n")?;

        let config = CohortConfig::load_with_dotenv().map_err(|e| e.to_string())?;
        assert_eq!(config.general.default_limit, 7);
        Ok(())
    });
}
