use std::fs;
use std::path::PathBuf;

use arbscout::application::pipeline::config::FlushFailurePolicy;
use arbscout::error::{ConfigError, Error};
use arbscout::infrastructure::config::profile::Profile;
use arbscout::infrastructure::config::settings::Config;

fn write_temp_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

fn example() -> String {
    fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example"))
        .expect("read config.toml.example")
}

#[test]
fn shipped_example_matches_the_defaults() {
    let from_example = Config::parse_toml(&example()).expect("example parses");
    let defaults = Config::parse_toml("").expect("empty config parses");
    assert_eq!(from_example, defaults);
}

#[test]
fn load_reads_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(
        &dir,
        r#"
[pipeline]
storage_workers = 2
flush_failure = "requeue"
requeue_limit = 50

[report]
discarded_path = "out/discarded.json"
"#,
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.pipeline.storage_workers, 2);
    assert_eq!(config.pipeline.flush_failure, FlushFailurePolicy::Requeue);
    assert_eq!(config.pipeline.requeue_limit, 50);
    assert_eq!(config.report.discarded_path, "out/discarded.json");
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn unknown_profile_is_a_parse_error() {
    let result = Config::parse_toml("profile = \"reckless\"\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn every_named_profile_loads() {
    for (name, profile) in [
        ("safe", Profile::Safe),
        ("balanced", Profile::Balanced),
        ("fast", Profile::Fast),
        ("stealth", Profile::Stealth),
    ] {
        let config = Config::parse_toml(&format!("profile = \"{name}\"\n")).unwrap();
        assert_eq!(config.profile, profile);
        let preset = profile.preset().unwrap();
        assert_eq!(config.pipeline.scrape_workers, preset.scrape_workers);
        assert_eq!(config.pacing.buff, preset.buff);
        assert_eq!(config.pacing.steam, preset.steam);
    }
}

#[test]
fn config_rejects_fee_rates_outside_unit_interval() {
    let result = Config::parse_toml("[evaluation]\nbuy_fee_rate = \"1.5\"\n");
    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "buy_fee_rate",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid fee error, got {err}"),
        Ok(config) => panic!(
            "Expected fee to be rejected, got {}",
            config.evaluation.buy_fee_rate
        ),
    }
}

#[test]
fn config_rejects_zero_storage_workers() {
    let result = Config::parse_toml("[pipeline]\nstorage_workers = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "storage_workers",
            ..
        }))
    ));
}

#[test]
fn config_rejects_empty_report_path() {
    let result = Config::parse_toml("[report]\ndiscarded_path = \"  \"\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MissingField {
            field: "discarded_path"
        }))
    ));
}

#[test]
fn fast_profile_is_warned_about() {
    let config = Config::parse_toml("profile = \"fast\"\n").unwrap();
    assert!(config.warnings().iter().any(|w| w.contains("fast")));
    assert!(Config::parse_toml("").unwrap().warnings().is_empty());
}
