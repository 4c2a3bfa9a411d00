//! Settings loaded from the process environment

use flux_conf::SettingsBuilder;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[rstest]
#[serial(flux_env)]
fn test_standard_builder_reads_environment_over_file() {
	let temp_dir = TempDir::new().unwrap();
	let path = temp_dir.path().join("flux.toml");
	fs::write(
		&path,
		r#"
[flux]
strict_errors = false
grid_tables = ["tt_content"]
"#,
	)
	.unwrap();

	// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
	// This test uses #[serial] to ensure exclusive access to environment variables.
	unsafe {
		env::set_var("FLUX_STRICT_ERRORS", "on");
		env::set_var("FLUX_GRID_TABLES", "tt_content,tx_news");
	}

	let settings = SettingsBuilder::standard(&path).build();

	// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
	// This test uses #[serial] to ensure exclusive access to environment variables.
	unsafe {
		env::remove_var("FLUX_STRICT_ERRORS");
		env::remove_var("FLUX_GRID_TABLES");
	}

	let settings = settings.unwrap();
	assert!(settings.strict_errors);
	assert!(settings.is_grid_table("tx_news"));
	assert_eq!(settings.grid_field, "pi_flexform");
}

#[rstest]
#[serial(flux_env)]
fn test_standard_builder_without_file_or_environment() {
	let settings = SettingsBuilder::standard("/nonexistent/flux.toml")
		.build()
		.unwrap();

	assert!(!settings.strict_errors);
	assert!(settings.validate_addresses);
}
