//! Integration tests for CLI argument handling
//!
//! Runs the binary against a temporary cache directory. None of these tests
//! reach the network: they cover help output, argument errors, and
//! redisplay of searches already on disk.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(cache_dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_countryfinder"))
        .arg("--cache-dir")
        .arg(cache_dir)
        // Unroutable so an accidental network call fails fast instead of hanging
        .args(["--api-url", "http://127.0.0.1:9"])
        .args(args)
        .env_remove("COUNTRIES_CACHE_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute countryfinder")
}

#[test]
fn test_help_flag_exits_successfully() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(dir.path(), &["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("countryfinder"), "Help should mention countryfinder");
    assert!(stdout.contains("capital"), "Help should list the capital subcommand");
    assert!(stdout.contains("region"), "Help should list the region subcommand");
}

#[test]
fn test_invalid_region_prints_error_and_exits() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(dir.path(), &["region", "Atlantis"]);
    assert!(!output.status.success(), "Expected invalid region to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("Invalid region").count(),
        1,
        "Should print the invalid region error exactly once: {}",
        stderr
    );
    assert!(stderr.starts_with("Error: Invalid region: 'Atlantis'"), "{}", stderr);
}

#[test]
fn test_show_with_empty_cache_lists_no_searches() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(dir.path(), &["show"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Last capital search: none"));
    assert!(stdout.contains("Last country search: none"));
    assert!(stdout.contains("Last region search: none"));
}

#[test]
fn test_show_redisplays_persisted_search() {
    let dir = TempDir::new().unwrap();
    let persisted = serde_json::json!({
        "version": 1,
        "saved_at": "2026-01-01T12:00:00Z",
        "store": {
            "by_capital": {"term": "", "countries": []},
            "by_country": {"term": "", "countries": []},
            "by_region": {
                "region": "Oceania",
                "countries": [
                    {"name": {"common": "Fiji", "official": "Republic of Fiji"}, "capital": ["Suva"], "population": 896444}
                ]
            }
        }
    });
    std::fs::write(dir.path().join("cacheStore.json"), persisted.to_string()).unwrap();

    let output = run_cli(dir.path(), &["show", "region"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Last region search: \"Oceania\" (1 result)"));
    assert!(stdout.contains("Fiji"));
    assert!(stdout.contains("Suva"));
    assert!(stdout.contains("896,444"));
    assert!(!stdout.contains("capital search"));
}

#[test]
fn test_corrupt_cache_file_fails_startup() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cacheStore.json"), "not json {{{").unwrap();

    let output = run_cli(dir.path(), &["show"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("corrupt"), "Should report corrupt cache: {}", stderr);
    assert_eq!(stderr.matches("is corrupt").count(), 1, "{}", stderr);
}

#[test]
fn test_refresh_with_empty_cache_does_nothing() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(dir.path(), &["refresh"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing cached to refresh"));
}

#[test]
fn test_failed_search_is_cached_as_empty() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(dir.path(), &["capital", "Lima"]);
    assert!(output.status.success(), "A failed lookup is not an error");
    assert!(String::from_utf8_lossy(&output.stdout).contains("No countries to show"));

    let output = run_cli(dir.path(), &["show", "capital"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Last capital search: \"Lima\" (0 results)"));
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use countryfinder::cli::{parse_region_arg, Cli, Command, KindArg};
    use countryfinder::data::Region;

    #[test]
    fn test_cli_region_subcommand() {
        let cli = Cli::parse_from(["countryfinder", "region", "Americas"]);
        assert_eq!(
            cli.command,
            Command::Region {
                region: "Americas".to_string()
            }
        );
    }

    #[test]
    fn test_cli_alpha_subcommand() {
        let cli = Cli::parse_from(["countryfinder", "alpha", "col"]);
        assert_eq!(
            cli.command,
            Command::Alpha {
                code: "col".to_string()
            }
        );
    }

    #[test]
    fn test_cli_show_capital() {
        let cli = Cli::parse_from(["countryfinder", "show", "capital"]);
        assert_eq!(
            cli.command,
            Command::Show {
                kind: Some(KindArg::Capital)
            }
        );
    }

    #[test]
    fn test_all_regions_parse() {
        for name in ["Africa", "Americas", "Asia", "Europe", "Oceania"] {
            let region = parse_region_arg(name).expect("Region should parse");
            assert_eq!(region.as_str(), name);
        }
        assert!(Region::from_name("Antarctic").is_none());
    }
}
