// SPDX-License-Identifier: MIT OR Apache-2.0
//! Classifier configuration: loading, validation, and merging.
//!
//! [`ClassifierConfig`] controls which reply headers carry the status and
//! description. Values are read from TOML and may be overridden from the
//! environment.

use crate::registry::{DESCRIPTION_HEADER, STATUS_HEADER};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A header name differs from the one the server sends.
    NonStandardHeader {
        /// Config field holding the name.
        field: String,
        /// Configured name.
        value: String,
        /// Name the server sends.
        standard: String,
    },
    /// Header names only match the wire if compared case-insensitively.
    CaseMismatch {
        /// Config field holding the name.
        field: String,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::NonStandardHeader {
                field,
                value,
                standard,
            } => write!(
                f,
                "{field} '{value}' differs from the server header '{standard}'"
            ),
            ConfigWarning::CaseMismatch { field } => write!(
                f,
                "{field} only matches the server header with case_insensitive_headers = true"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Config type
// ---------------------------------------------------------------------------

/// Settings for [`crate::Classifier`].
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Header holding the numeric status. Defaults to `Status`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_header: Option<String>,

    /// Header holding the description. Defaults to `Description`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_header: Option<String>,

    /// Match header names ignoring ASCII case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive_headers: Option<bool>,

    /// Log level for tools embedding the classifier (e.g. `"debug"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            status_header: None,
            description_header: None,
            case_insensitive_headers: None,
            log_level: Some("info".into()),
        }
    }
}

impl ClassifierConfig {
    /// Effective status header name.
    pub fn status_header(&self) -> &str {
        self.status_header.as_deref().unwrap_or(STATUS_HEADER)
    }

    /// Effective description header name.
    pub fn description_header(&self) -> &str {
        self.description_header
            .as_deref()
            .unwrap_or(DESCRIPTION_HEADER)
    }

    /// Effective case sensitivity.
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive_headers.unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Recognised log levels.
const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`ClassifierConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`ClassifierConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<ClassifierConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)?
        }
        None => ClassifierConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML string into a [`ClassifierConfig`].
pub fn parse_toml(content: &str) -> Result<ClassifierConfig, ConfigError> {
    toml::from_str::<ClassifierConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Environment variables read by [`apply_env_overrides`].
pub const ENV_VARS: &[&str] = &[
    "JETSTREAM_STATUS_HEADER",
    "JETSTREAM_DESCRIPTION_HEADER",
    "JETSTREAM_CASE_INSENSITIVE_HEADERS",
    "JETSTREAM_LOG_LEVEL",
];

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `JETSTREAM_STATUS_HEADER`
/// - `JETSTREAM_DESCRIPTION_HEADER`
/// - `JETSTREAM_CASE_INSENSITIVE_HEADERS` (`true`/`false`/`1`/`0`)
/// - `JETSTREAM_LOG_LEVEL`
pub fn apply_env_overrides(config: &mut ClassifierConfig) {
    apply_overrides_from(config, |name| std::env::var(name).ok());
}

/// Apply overrides from any variable source; `lookup` returns the value of a
/// variable if it is set.
pub fn apply_overrides_from<F>(config: &mut ClassifierConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("JETSTREAM_STATUS_HEADER") {
        config.status_header = Some(val);
    }
    if let Some(val) = lookup("JETSTREAM_DESCRIPTION_HEADER") {
        config.description_header = Some(val);
    }
    if let Some(val) = lookup("JETSTREAM_CASE_INSENSITIVE_HEADERS") {
        match parse_bool(&val) {
            Some(flag) => config.case_insensitive_headers = Some(flag),
            None => warn!(
                target: "jetstream.config",
                value = %val,
                "ignoring JETSTREAM_CASE_INSENSITIVE_HEADERS, expected true or false"
            ),
        }
    }
    if let Some(val) = lookup("JETSTREAM_LOG_LEVEL") {
        config.log_level = Some(val);
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// Empty or identical header names and unknown log levels are hard errors;
/// non-standard header names come back as warnings.
pub fn validate_config(config: &ClassifierConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    if let Some(ref level) = config.log_level
        && !VALID_LOG_LEVELS.contains(&level.as_str())
    {
        errors.push(format!("invalid log_level '{level}'"));
    }

    let headers = [
        ("status_header", config.status_header(), STATUS_HEADER),
        (
            "description_header",
            config.description_header(),
            DESCRIPTION_HEADER,
        ),
    ];
    for (field, value, standard) in headers {
        if value.trim().is_empty() {
            errors.push(format!("{field} must not be empty"));
        } else if value != standard {
            if value.eq_ignore_ascii_case(standard) {
                if !config.case_insensitive() {
                    warnings.push(ConfigWarning::CaseMismatch {
                        field: field.into(),
                    });
                }
            } else {
                warnings.push(ConfigWarning::NonStandardHeader {
                    field: field.into(),
                    value: value.into(),
                    standard: standard.into(),
                });
            }
        }
    }

    let same = if config.case_insensitive() {
        config
            .status_header()
            .eq_ignore_ascii_case(config.description_header())
    } else {
        config.status_header() == config.description_header()
    };
    if same {
        errors.push("status_header and description_header must differ".into());
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations.  Values in `overlay` take precedence over `base`.
pub fn merge_configs(base: ClassifierConfig, overlay: ClassifierConfig) -> ClassifierConfig {
    ClassifierConfig {
        status_header: overlay.status_header.or(base.status_header),
        description_header: overlay.description_header.or(base.description_header),
        case_insensitive_headers: overlay
            .case_insensitive_headers
            .or(base.case_insensitive_headers),
        log_level: overlay.log_level.or(base.log_level),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid_without_warnings() {
        let warnings = validate_config(&ClassifierConfig::default()).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn defaults_match_wire_headers() {
        let cfg = ClassifierConfig::default();
        assert_eq!(cfg.status_header(), "Status");
        assert_eq!(cfg.description_header(), "Description");
        assert!(!cfg.case_insensitive());
        assert_eq!(cfg.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn parse_valid_toml_string() {
        let cfg = parse_toml(
            r#"
            status_header = "X-Status"
            case_insensitive_headers = true
            log_level = "debug"
        "#,
        )
        .unwrap();
        assert_eq!(cfg.status_header(), "X-Status");
        assert_eq!(cfg.description_header(), "Description");
        assert!(cfg.case_insensitive());
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn parse_invalid_toml_gives_parse_error() {
        let err = parse_toml("this is [not valid toml =").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn parse_wrong_types_gives_parse_error() {
        let err = parse_toml("case_insensitive_headers = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn validation_catches_invalid_log_level() {
        let cfg = ClassifierConfig {
            log_level: Some("verbose".into()),
            ..Default::default()
        };
        let err = validate_config(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn validation_catches_empty_header() {
        let cfg = ClassifierConfig {
            status_header: Some("  ".into()),
            ..Default::default()
        };
        match validate_config(&cfg).unwrap_err() {
            ConfigError::ValidationError { reasons } => {
                assert!(reasons.iter().any(|r| r == "status_header must not be empty"));
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn validation_catches_identical_headers() {
        let cfg = ClassifierConfig {
            status_header: Some("status".into()),
            description_header: Some("STATUS".into()),
            case_insensitive_headers: Some(true),
            ..Default::default()
        };
        match validate_config(&cfg).unwrap_err() {
            ConfigError::ValidationError { reasons } => {
                assert!(reasons.iter().any(|r| r.contains("must differ")));
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn non_standard_header_warns() {
        let cfg = ClassifierConfig {
            description_header: Some("X-Desc".into()),
            ..Default::default()
        };
        let warnings = validate_config(&cfg).unwrap();
        assert_eq!(
            warnings,
            vec![ConfigWarning::NonStandardHeader {
                field: "description_header".into(),
                value: "X-Desc".into(),
                standard: "Description".into(),
            }]
        );
        assert_eq!(
            warnings[0].to_string(),
            "description_header 'X-Desc' differs from the server header 'Description'"
        );
    }

    #[test]
    fn case_mismatch_warns_only_when_case_sensitive() {
        let mut cfg = ClassifierConfig {
            status_header: Some("status".into()),
            ..Default::default()
        };
        let warnings = validate_config(&cfg).unwrap();
        assert!(matches!(warnings[..], [ConfigWarning::CaseMismatch { .. }]));

        cfg.case_insensitive_headers = Some(true);
        assert!(validate_config(&cfg).unwrap().is_empty());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ClassifierConfig {
            status_header: Some("A".into()),
            description_header: Some("B".into()),
            ..Default::default()
        };
        let overlay = ClassifierConfig {
            status_header: Some("C".into()),
            case_insensitive_headers: Some(true),
            log_level: None,
            ..Default::default()
        };
        let merged = merge_configs(base, overlay);
        assert_eq!(merged.status_header(), "C");
        assert_eq!(merged.description_header(), "B");
        assert!(merged.case_insensitive());
        assert_eq!(merged.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn load_missing_file_is_file_not_found() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn load_from_file() {
        let content = "description_header = \"Desc\"\n";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        let cfg = load_config(Some(file.path())).unwrap();

        let mut expected = parse_toml(content).unwrap();
        apply_env_overrides(&mut expected);
        assert_eq!(cfg, expected);
    }

    #[test]
    fn parse_file_contents() {
        let cfg = parse_toml("description_header = \"Desc\"").unwrap();
        assert_eq!(cfg.description_header(), "Desc");
        assert_eq!(cfg.status_header(), "Status");
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn overrides_replace_every_field() {
        let mut cfg = ClassifierConfig::default();
        apply_overrides_from(
            &mut cfg,
            vars(&[
                ("JETSTREAM_STATUS_HEADER", "Code"),
                ("JETSTREAM_DESCRIPTION_HEADER", "Reason"),
                ("JETSTREAM_CASE_INSENSITIVE_HEADERS", "true"),
                ("JETSTREAM_LOG_LEVEL", "debug"),
            ]),
        );
        assert_eq!(cfg.status_header(), "Code");
        assert_eq!(cfg.description_header(), "Reason");
        assert!(cfg.case_insensitive());
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn case_insensitive_override_accepts_flags() {
        for (raw, expected) in [("1", true), ("FALSE", false), (" 0 ", false), ("True", true)] {
            let mut cfg = ClassifierConfig::default();
            apply_overrides_from(&mut cfg, vars(&[("JETSTREAM_CASE_INSENSITIVE_HEADERS", raw)]));
            assert_eq!(cfg.case_insensitive_headers, Some(expected), "{raw:?}");
        }
    }

    #[test]
    fn unparsable_case_insensitive_override_is_ignored() {
        let mut cfg = ClassifierConfig {
            case_insensitive_headers: Some(true),
            ..Default::default()
        };
        apply_overrides_from(&mut cfg, vars(&[("JETSTREAM_CASE_INSENSITIVE_HEADERS", "yes")]));
        assert_eq!(cfg.case_insensitive_headers, Some(true));
    }

    #[test]
    fn no_variables_leave_config_alone() {
        let mut cfg = ClassifierConfig::default();
        apply_overrides_from(&mut cfg, vars(&[]));
        assert_eq!(cfg, ClassifierConfig::default());
    }

    #[test]
    fn env_var_list_matches_overrides() {
        let mut cfg = ClassifierConfig::default();
        apply_overrides_from(&mut cfg, |name| {
            assert!(ENV_VARS.contains(&name), "unlisted variable {name}");
            None
        });
    }
}
