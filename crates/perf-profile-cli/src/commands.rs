//! Subcommand implementations.
//!
//! Missing data never fails a command: an absent profile is logged as a
//! warning and the command exits successfully with no output.

use anyhow::{Context, Result};
use perf_profile::{
    build, PerformanceProfile, ProfileCurves, ProfileRegistry, ProfileReport, ProfileSettings,
    RunTable,
};
use std::path::Path;
use tracing::{info, warn};

/// Parameters shared by every profile-building subcommand
#[derive(Debug, Clone)]
pub struct ProfileRequest<'a> {
    pub results: &'a Path,
    pub profile: &'a str,
    pub bench_id: Option<String>,
    pub combos: Option<&'a [String]>,
}

impl ProfileRequest<'_> {
    fn bench_id(&self) -> String {
        self.bench_id.clone().unwrap_or_else(|| {
            self.results
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "benchmark".to_string())
        })
    }
}

/// Built-in profiles plus any declared in the settings file
pub fn load_registry(config: Option<&Path>) -> Result<ProfileRegistry> {
    let mut registry = ProfileRegistry::with_defaults();
    if let Some(path) = config {
        let settings = ProfileSettings::load(path)
            .with_context(|| format!("Failed to load profile settings from {}", path.display()))?;
        let count = registry
            .apply_settings(settings)
            .with_context(|| format!("Invalid profile settings in {}", path.display()))?;
        info!(count, path = %path.display(), "Registered profiles from settings");
    }
    Ok(registry)
}

/// Load the results and build the requested profile
pub fn build_profile(
    registry: &ProfileRegistry,
    request: &ProfileRequest<'_>,
) -> Result<Option<PerformanceProfile>> {
    let config = registry.get(request.profile)?;
    let table = RunTable::load(request.results)
        .with_context(|| format!("Failed to load results from {}", request.results.display()))?;
    let bench_id = request.bench_id();

    let profile = build(&table, &bench_id, config, request.combos)
        .with_context(|| format!("Failed to build profile '{}'", request.profile))?;
    if profile.is_none() {
        warn!(
            bench = %bench_id,
            profile = request.profile,
            "No data to build a profile from"
        );
    }
    Ok(profile)
}

/// Render the report, `None` when there is no profile
pub fn report(
    registry: &ProfileRegistry,
    request: &ProfileRequest<'_>,
    json: bool,
) -> Result<Option<String>> {
    let Some(profile) = build_profile(registry, request)? else {
        return Ok(None);
    };
    let report = ProfileReport::from_profile(&profile);
    let text = if json {
        report.to_json()?
    } else {
        report.format_report()
    };
    Ok(Some(text))
}

/// Write curve JSON to `output` (or stdout); returns whether anything was written
pub fn curves(
    registry: &ProfileRegistry,
    request: &ProfileRequest<'_>,
    output: Option<&Path>,
) -> Result<bool> {
    let Some(profile) = build_profile(registry, request)? else {
        return Ok(false);
    };
    let json = ProfileCurves::from_profile(&profile).to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write curves to {}", path.display()))?;
            info!(path = %path.display(), combos = profile.combos().len(), "Wrote curves");
        }
        None => println!("{}", json),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_results(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("suite.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    fn request<'a>(results: &'a Path, profile: &'a str) -> ProfileRequest<'a> {
        ProfileRequest {
            results,
            profile,
            bench_id: None,
            combos: None,
        }
    }

    const RESULTS: &str = r#"{"results": [
        {"problem": "p1", "size": 1, "solver": "a", "success": true, "time": {"wall": 1.0}},
        {"problem": "p1", "size": 1, "solver": "b", "success": true, "time": {"wall": 2.0}}
    ]}"#;

    #[test]
    fn test_report_markdown_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let results = write_results(dir.path(), RESULTS);
        let registry = load_registry(None).unwrap();

        let text = report(&registry, &request(&results, "wall_time"), false)
            .unwrap()
            .unwrap();
        assert!(text.contains("# Performance Profile: suite (wall_time)"));
        assert!(text.contains("| (a) | 100.0% | 100.0% |"));
    }

    #[test]
    fn test_empty_results_warn_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let results = write_results(dir.path(), r#"{"results": []}"#);
        let registry = load_registry(None).unwrap();

        assert!(report(&registry, &request(&results, "wall_time"), true)
            .unwrap()
            .is_none());
        assert!(!curves(&registry, &request(&results, "wall_time"), None).unwrap());
    }

    #[test]
    fn test_unknown_profile_fails() {
        let dir = tempfile::tempdir().unwrap();
        let results = write_results(dir.path(), RESULTS);
        let registry = load_registry(None).unwrap();

        let err = report(&registry, &request(&results, "memory"), false).unwrap_err();
        assert!(err.to_string().contains("known profiles"));
    }

    #[test]
    fn test_curves_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let results = write_results(dir.path(), RESULTS);
        let output = dir.path().join("curves.json");
        let registry = load_registry(None).unwrap();

        let mut req = request(&results, "wall_time");
        req.bench_id = Some("custom".to_string());
        assert!(curves(&registry, &req, Some(&output)).unwrap());

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["bench_id"], "custom");
        assert_eq!(value["curves"][1]["x"], serde_json::json!([2.0]));
    }

    #[test]
    fn test_settings_file_registers_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("profiles.toml");
        std::fs::write(
            &settings,
            "[profiles.fast]\ncriterion = \"wall_time\"\ninstance_keys = [\"problem\"]\n",
        )
        .unwrap();

        let registry = load_registry(Some(&settings)).unwrap();
        assert!(registry.contains("fast"));

        std::fs::write(&settings, "[profiles.bad]\ncriterion = \"nope\"\n").unwrap();
        assert!(load_registry(Some(&settings)).is_err());
    }
}
