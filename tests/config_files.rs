//! Store tests against the fixture files
//!
//! Reads, merges, filters and writes whole files through `ConfigDict`.

mod fixtures;

use cfgdict::{parse_text, ConfigDict, ConfigError, ConfigNode, Entry, Scalar, Value};
use serde_json::json;
use tempfile::TempDir;

fn load(paths: &[std::path::PathBuf]) -> ConfigDict {
    let mut config = ConfigDict::default();
    config.read(paths, None).unwrap();
    config
}

// =============================================================================
// Reading
// =============================================================================

#[test]
fn test_dotted_header_nests() {
    let config = load(&[fixtures::base_path()]);

    let calibration = config.get_section("detector.calibration").unwrap();
    assert!(calibration.contains_key("coefficients"));
    assert!(config.section("detector.calibration").is_none());
}

#[test]
fn test_escaped_header_is_single_segment() {
    let config = load(&[fixtures::base_path()]);

    let plugins = config.section("plugins.v1.2").unwrap();
    assert_eq!(plugins.get_i64("enabled"), Some(1));
    assert_eq!(config.get_i64("plugins_|_v1_|_2.enabled"), Some(1));
    assert!(config.section("plugins").is_none());
}

#[test]
fn test_unescaped_dot_still_splits_header() {
    let node = parse_text("[plugins_|_v1.2]\nenabled = 1\n", None).unwrap();

    let v1 = node.section("plugins.v1").unwrap();
    assert_eq!(v1.get_section("2").and_then(|s| s.get_i64("enabled")), Some(1));
    assert_eq!(node.get_i64("plugins_|_v1.2.enabled"), Some(1));
}

#[test]
fn test_scalar_types() {
    let config = load(&[fixtures::base_path()]);

    assert_eq!(config.get_str("name"), Some("beamline"));
    assert_eq!(config.get_i64("version"), Some(2));
    assert_eq!(config.get_f64("detector.gain"), Some(1.5));
    assert_eq!(
        config.get_list("detector.channels"),
        Some(&[Scalar::Int(1), Scalar::Int(2), Scalar::Int(3), Scalar::Int(4)][..])
    );
}

#[test]
fn test_continuation_lines_form_matrix() {
    let config = load(&[fixtures::base_path()]);

    let positions = config.get_value("motors.positions").unwrap();
    assert_eq!(
        positions.as_matrix(),
        Some(
            &[
                vec![Scalar::Int(1), Scalar::Int(2)],
                vec![Scalar::Int(3), Scalar::Int(4)],
            ][..]
        )
    );
}

#[test]
fn test_malformed_array_degrades_to_string() {
    let config = load(&[fixtures::base_path()]);
    assert_eq!(config.get_str("motors.broken"), Some("[1.0 abc]"));
}

#[cfg(feature = "numeric-array")]
#[test]
fn test_bracketed_values_are_numeric_arrays() {
    let config = load(&[fixtures::base_path()]);

    let coefficients = config
        .get_value("detector.calibration.coefficients")
        .and_then(Value::as_array)
        .unwrap();
    assert_eq!(coefficients.shape(), &[3]);
    assert_eq!(coefficients.as_slice(), &[0.0, 1.0, 0.25]);

    let grid = config
        .get_value("detector.calibration.grid")
        .and_then(Value::as_array)
        .unwrap();
    assert_eq!(grid.shape(), &[2, 2]);
    assert_eq!(grid.get(1, 0), Some(3.0));
}

#[cfg(not(feature = "numeric-array"))]
#[test]
fn test_bracketed_values_fall_back_to_float_lists() {
    let config = load(&[fixtures::base_path()]);

    assert_eq!(
        config.get_list("detector.calibration.coefficients"),
        Some(&[Scalar::Float(0.0), Scalar::Float(1.0), Scalar::Float(0.25)][..])
    );
    let grid = config.get_value("detector.calibration.grid").unwrap();
    assert_eq!(grid.as_matrix().map(|rows| rows.len()), Some(2));
}

#[test]
fn test_default_section_inherited_by_named_sections() {
    let config = load(&[fixtures::base_path()]);

    assert_eq!(config.get_str("detector.unit"), Some("mm"));
    assert_eq!(config.get_str("motors.unit"), Some("mm"));
    assert!(config.get_path("unit").is_none());
    assert!(config.get_path("DEFAULT").is_none());
}

// =============================================================================
// Merging several files
// =============================================================================

#[test]
fn test_later_file_wins() {
    let config = load(&[fixtures::base_path(), fixtures::site_path()]);

    assert_eq!(config.get_i64("version"), Some(3));
    assert_eq!(config.get_str("detector.mode"), Some("manual"));
    assert_eq!(
        config.get_list("detector.channels"),
        Some(&[Scalar::Int(7), Scalar::Int(8)][..])
    );
    // Untouched keys survive
    assert_eq!(config.get_f64("detector.gain"), Some(1.5));
    assert!(config.get_section("detector.calibration").is_some());
    assert_eq!(config.get_str("site.owner"), Some("ops team"));
}

#[test]
fn test_provenance_in_read_order() {
    let config = load(&[fixtures::base_path(), fixtures::site_path()]);

    let paths: Vec<_> = config.files().iter().map(|f| f.path.clone()).collect();
    assert_eq!(paths, vec![fixtures::base_path(), fixtures::site_path()]);
    assert_eq!(config.last_file().unwrap().path, fixtures::site_path());
    assert!(config.files().iter().all(|f| f.sections.is_none()));
    assert!(config.files().iter().all(|f| f.digest.len() == 64));
}

#[test]
fn test_read_in_two_calls_matches_one_call() {
    let together = load(&[fixtures::base_path(), fixtures::site_path()]);

    let mut separate = ConfigDict::default();
    separate.read(&[fixtures::base_path()], None).unwrap();
    separate.read(&[fixtures::site_path()], None).unwrap();

    assert_eq!(separate.data(), together.data());
    assert_eq!(separate.files().len(), 2);
}

#[test]
fn test_malformed_file_leaves_store_untouched() {
    let mut config = load(&[fixtures::base_path()]);
    let before = config.data().clone();

    let err = config
        .read(&[fixtures::site_path(), fixtures::malformed_path()], None)
        .unwrap_err();

    assert!(err.is_parse_error());
    assert!(err.to_string().contains("malformed.cfg"));
    assert_eq!(config.data(), &before);
    assert_eq!(config.files().len(), 1);
}

// =============================================================================
// Section filter
// =============================================================================

#[test]
fn test_filter_imports_exact_headers_only() {
    let mut config = ConfigDict::default();
    config
        .read(&[fixtures::base_path()], Some(&["detector"]))
        .unwrap();

    assert_eq!(config.get_str("detector.mode"), Some("auto"));
    assert!(config.get_path("detector.calibration").is_none());
    assert!(config.get_path("motors").is_none());
    assert!(config.get_path("name").is_none());
    assert_eq!(
        config.last_file().unwrap().sections,
        Some(vec!["detector".to_string()])
    );
}

#[test]
fn test_filter_with_escaped_header() {
    let mut config = ConfigDict::default();
    config
        .read(&[fixtures::base_path()], Some(&["plugins_|_v1_|_2"]))
        .unwrap();

    assert_eq!(config.keys().collect::<Vec<_>>(), vec!["plugins.v1.2"]);
}

// =============================================================================
// Writing
// =============================================================================

#[test]
fn test_write_and_read_back() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("merged.cfg");

    let config = load(&[fixtures::base_path(), fixtures::site_path()]);
    config.write(&out, None).unwrap();

    let reread = load(&[out]);
    assert_eq!(reread.data(), config.data());
}

#[test]
fn test_written_matrix_uses_tab_rows() {
    let config = load(&[fixtures::base_path()]);
    let text = config.to_text(None);
    assert!(text.contains("positions = 1, 2\n\t3, 4\n"));
    assert!(text.contains("\n[plugins_|_v1_|_2]\n"));
}

#[test]
fn test_write_filter_keeps_top_level_values() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("site-only.cfg");

    let config = load(&[fixtures::base_path(), fixtures::site_path()]);
    config.write(&out, Some(&["site"])).unwrap();

    let reread = load(&[out]);
    assert_eq!(reread.get_str("name"), Some("beamline"));
    assert_eq!(reread.get_str("site.owner"), Some("ops team"));
    assert!(reread.get_path("detector").is_none());
    assert!(reread.get_path("motors").is_none());
}

// =============================================================================
// Reset, clear, provenance errors
// =============================================================================

fn json_defaults() -> ConfigNode {
    ConfigNode::from_json(&json!({
        "name": "unset",
        "detector": { "gain": 1, "enabled": true },
        "roi": [[0, 10], [5, 15]]
    }))
    .unwrap()
}

#[test]
fn test_json_defaults() {
    let defaults = json_defaults();
    assert_eq!(defaults.get_i64("detector.gain"), Some(1));
    assert_eq!(defaults.get_str("detector.enabled"), Some("true"));
    assert_eq!(
        defaults.get_value("roi").and_then(Value::as_matrix).map(|rows| rows.len()),
        Some(2)
    );
}

#[test]
fn test_json_null_rejected() {
    let err = ConfigNode::from_json(&json!({ "a": { "b": null } })).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedJson { ref path, .. } if path == "a.b"));
}

#[test]
fn test_reset_restores_defaults() {
    let mut config = ConfigDict::new(json_defaults());
    config.read(&[fixtures::base_path()], None).unwrap();
    assert_eq!(config.get_str("name"), Some("beamline"));
    assert!(config.contains_key("motors"));

    config.reset();

    assert_eq!(config.data(), &json_defaults());
    assert!(!config.contains_key("motors"));
}

#[test]
fn test_clear_empties_contents_and_provenance() {
    let mut config = ConfigDict::new(json_defaults());
    config.read(&[fixtures::base_path()], None).unwrap();

    config.clear();

    assert!(config.is_empty());
    assert!(config.files().is_empty());
}

#[test]
fn test_last_file_without_reads() {
    let config = ConfigDict::new(json_defaults());
    let err = config.last_file().unwrap_err();
    assert!(matches!(err, ConfigError::EmptyProvenance));
}

#[test]
fn test_in_memory_edits() {
    let mut config = load(&[fixtures::base_path()]);
    config
        .walk_mut(&["detector", "calibration"])
        .insert("offset", -0.5);
    config.insert("version", "draft");

    assert_eq!(config.get_f64("detector.calibration.offset"), Some(-0.5));
    assert!(matches!(
        config.get_path("version"),
        Some(Entry::Value(Value::Scalar(Scalar::Str(s)))) if s == "draft"
    ));
}
