use toml::Value;

use mill_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn sample_with<F>(mutate: F) -> Result<Config, toml::de::Error>
where
	F: FnOnce(&mut Value),
{
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");

	mutate(&mut value);

	value.try_into()
}

#[test]
fn sample_config_passes_validation() {
	let cfg = sample_config();

	mill_config::validate(&cfg).expect("Sample config must validate.");
}

#[test]
fn lookup_defaults_apply_when_section_missing() {
	let cfg = sample_with(|value| {
		value.as_table_mut().expect("Config must be a table.").remove("lookup");
	})
	.expect("Config without [lookup] must still parse.");

	assert_eq!(cfg.lookup.debounce_ms, 300);
	assert_eq!(cfg.lookup.page_size, 20);
	assert_eq!(cfg.lookup.job_page_size, 10);

	mill_config::validate(&cfg).expect("Defaults must validate.");
}

#[test]
fn zero_debounce_is_rejected() {
	let cfg = sample_with(|value| {
		value["lookup"]["debounce_ms"] = Value::Integer(0);
	})
	.expect("Config must parse.");
	let err = mill_config::validate(&cfg).expect_err("Zero debounce must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn zero_page_sizes_are_rejected() {
	for key in ["page_size", "job_page_size"] {
		let cfg = sample_with(|value| {
			value["lookup"][key] = Value::Integer(0);
		})
		.expect("Config must parse.");

		assert!(
			mill_config::validate(&cfg).is_err(),
			"lookup.{key} = 0 must be rejected",
		);
	}
}

#[test]
fn empty_binds_are_rejected() {
	for key in ["http_bind", "admin_bind"] {
		let cfg = sample_with(|value| {
			value["service"][key] = Value::String(" ".to_string());
		})
		.expect("Config must parse.");

		assert!(mill_config::validate(&cfg).is_err(), "service.{key} blank must be rejected");
	}
}

#[test]
fn empty_dsn_is_rejected() {
	let cfg = sample_with(|value| {
		value["storage"]["postgres"]["dsn"] = Value::String(String::new());
	})
	.expect("Config must parse.");

	assert!(mill_config::validate(&cfg).is_err());
}

#[test]
fn zero_pool_size_is_rejected() {
	let cfg = sample_with(|value| {
		value["storage"]["postgres"]["pool_max_conns"] = Value::Integer(0);
	})
	.expect("Config must parse.");

	assert!(mill_config::validate(&cfg).is_err());
}
