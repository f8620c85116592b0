// DevPanel - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers. The report
// shapes mirror the backend's JSON payloads exactly; derived fields live
// in `CheckOutcome` and are computed once per successful check response.

use crate::util::constants;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Check report (payload of `check_application`)
// =============================================================================

/// Errors and warnings produced by one analysis pass (frontend, tests, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubReport {
    /// Blocking findings.
    #[serde(default)]
    pub errors: Vec<String>,

    /// Non-blocking findings.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Application metadata extracted from the backend sources.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendMetadata {
    /// Declared application version.
    #[serde(default)]
    pub version: String,

    /// Long HTML description shown on the build tab.
    #[serde(default, rename = "longdescription")]
    pub long_description: String,
}

/// Analysis of the application's backend sources.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendReport {
    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default)]
    pub warnings: Vec<String>,

    /// Application metadata (version, description, ...).
    #[serde(default)]
    pub metadata: BackendMetadata,
}

/// A packaging script file found next to the application sources.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptFile {
    /// Bare filename (e.g. "preinst.sh").
    pub filename: String,
}

/// Analysis of the application's packaging scripts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptsReport {
    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default)]
    pub warnings: Vec<String>,

    /// Script files present in the application sources.
    #[serde(default)]
    pub files: Vec<ScriptFile>,
}

/// Changelog consistency summary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangelogReport {
    /// True when the changelog still carries an unreleased marker.
    #[serde(default)]
    pub unreleased: bool,

    /// Version of the most recent changelog entry.
    #[serde(default)]
    pub version: String,
}

/// Full check report returned by `check_application`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckReport {
    pub backend: BackendReport,
    pub frontend: SubReport,
    pub tests: SubReport,
    pub scripts: ScriptsReport,
    pub changelog: ChangelogReport,
}

// =============================================================================
// Check outcome (report + derived display fields)
// =============================================================================

/// A check report enriched with the aggregates the dashboard displays.
///
/// Computed once per successful check response; the raw report is kept so
/// the host can render the itemised findings.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// The raw report as received.
    pub report: CheckReport,

    /// Sum of error counts over backend/frontend/tests/scripts.
    pub errors_count: usize,

    /// Sum of warning counts over backend/frontend/tests/scripts.
    pub warnings_count: usize,

    /// True iff the changelog has no unreleased marker and its version
    /// equals the backend metadata version.
    pub version_ok: bool,

    /// Whether a pre-install script is present.
    pub preinst_script_found: bool,

    /// Whether a pre-uninstall script is present.
    pub preuninst_script_found: bool,

    /// Whether a post-install script is present.
    pub postinst_script_found: bool,

    /// Whether a post-uninstall script is present.
    pub postuninst_script_found: bool,
}

impl CheckOutcome {
    /// Compute the derived display fields from a raw report.
    ///
    /// Plain summation over the four sub-reports; no special-casing.
    pub fn from_report(report: CheckReport) -> Self {
        let errors_count = report.backend.errors.len()
            + report.frontend.errors.len()
            + report.tests.errors.len()
            + report.scripts.errors.len();
        let warnings_count = report.backend.warnings.len()
            + report.frontend.warnings.len()
            + report.tests.warnings.len()
            + report.scripts.warnings.len();

        let version_ok = !report.changelog.unreleased
            && report.changelog.version == report.backend.metadata.version;

        let has_script = |name: &str| report.scripts.files.iter().any(|f| f.filename == name);

        Self {
            errors_count,
            warnings_count,
            version_ok,
            preinst_script_found: has_script(constants::PREINST_SCRIPT),
            preuninst_script_found: has_script(constants::PREUNINST_SCRIPT),
            postinst_script_found: has_script(constants::POSTINST_SCRIPT),
            postuninst_script_found: has_script(constants::POSTUNINST_SCRIPT),
            report,
        }
    }
}

// =============================================================================
// Breaking changes report (payload of `detect_breaking_changes`)
// =============================================================================

/// Breaking-change findings against the previously published version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreakingChangesReport {
    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default)]
    pub warnings: Vec<String>,
}

// =============================================================================
// Documentation report (payload of `generate_documentation`)
// =============================================================================

/// One documented command argument.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgDoc {
    /// Argument name.
    pub name: String,

    /// Declared type.
    #[serde(default, rename = "type")]
    pub type_name: String,

    /// Whether the argument may be omitted.
    #[serde(default)]
    pub optional: bool,

    /// Default value. Rendered only when present and non-null.
    #[serde(default)]
    pub default: Option<Value>,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// Accepted value formats (rendered as a nested sub-list when non-empty).
    #[serde(default)]
    pub formats: Vec<String>,
}

/// One documented return value.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnDoc {
    #[serde(default, rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub formats: Vec<String>,
}

/// One documented raised exception.
#[derive(Debug, Clone, Deserialize)]
pub struct RaiseDoc {
    #[serde(default, rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub description: String,
}

/// Documentation extracted for a single backend command.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandDoc {
    #[serde(default)]
    pub args: Vec<ArgDoc>,

    #[serde(default)]
    pub returns: Vec<ReturnDoc>,

    #[serde(default)]
    pub raises: Vec<RaiseDoc>,
}

/// Documentation-quality findings for a single backend command.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandCheck {
    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Full payload of `generate_documentation`.
///
/// `doc` is a BTreeMap so commands render in a deterministic (sorted) order;
/// the wire format carries no meaningful ordering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentationReport {
    #[serde(default)]
    pub doc: BTreeMap<String, CommandDoc>,

    #[serde(default)]
    pub check: HashMap<String, CommandCheck>,

    /// Overall verdict; drives the validity notification.
    #[serde(default)]
    pub valid: bool,
}

// =============================================================================
// Remote-development device
// =============================================================================

/// The remote-development helper device owned by the developer module.
///
/// The `running` flag mirrors backend state and is only flipped on a
/// confirmed start/stop response.
#[derive(Debug, Clone)]
pub struct RemotedevDevice {
    /// Device uuid from the registry.
    pub uuid: String,

    /// Whether the remote-development service is running.
    pub running: bool,
}

// =============================================================================
// Dashboard tab
// =============================================================================

/// Navigation tabs of the developer dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    /// Check results and package build.
    #[default]
    Build,

    /// Unit tests and coverage output.
    Tests,

    /// Documentation output and rendered fragment.
    Documentation,
}

// =============================================================================
// Notifications
// =============================================================================

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A user-facing notification queued by the session.
///
/// The session never renders toasts itself: notifications accumulate in a
/// session-scoped outbox the host shell drains and displays.
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report_from_json(value: Value) -> CheckReport {
        serde_json::from_value(value).expect("check report should deserialise")
    }

    fn sample_report() -> CheckReport {
        report_from_json(json!({
            "backend": {
                "errors": ["e1", "e2"],
                "warnings": ["w1"],
                "metadata": {"version": "1.2.0", "longdescription": "<p>desc</p>"}
            },
            "frontend": {"errors": [], "warnings": ["w2", "w3"]},
            "tests": {"errors": ["e3"], "warnings": []},
            "scripts": {
                "errors": [],
                "warnings": [],
                "files": [{"filename": "preinst.sh"}, {"filename": "postuninst.sh"}]
            },
            "changelog": {"unreleased": false, "version": "1.2.0"}
        }))
    }

    /// errors_count is the exact sum across backend/frontend/tests/scripts.
    #[test]
    fn test_errors_count_is_sum_over_sub_reports() {
        let outcome = CheckOutcome::from_report(sample_report());
        assert_eq!(outcome.errors_count, 3);
    }

    /// warnings_count is the exact sum across backend/frontend/tests/scripts.
    #[test]
    fn test_warnings_count_is_sum_over_sub_reports() {
        let outcome = CheckOutcome::from_report(sample_report());
        assert_eq!(outcome.warnings_count, 3);
    }

    /// version_ok holds when the changelog is released and versions match.
    #[test]
    fn test_version_ok_released_and_matching() {
        let outcome = CheckOutcome::from_report(sample_report());
        assert!(outcome.version_ok);
    }

    /// An unreleased changelog marker forces version_ok to false even when
    /// versions match.
    #[test]
    fn test_version_ok_false_when_unreleased() {
        let mut report = sample_report();
        report.changelog.unreleased = true;
        let outcome = CheckOutcome::from_report(report);
        assert!(!outcome.version_ok);
    }

    /// A changelog/metadata version mismatch forces version_ok to false.
    #[test]
    fn test_version_ok_false_on_version_mismatch() {
        let mut report = sample_report();
        report.changelog.version = "1.3.0".to_string();
        let outcome = CheckOutcome::from_report(report);
        assert!(!outcome.version_ok);
    }

    /// Script presence flags reflect the filenames listed in the report.
    #[test]
    fn test_script_presence_flags() {
        let outcome = CheckOutcome::from_report(sample_report());
        assert!(outcome.preinst_script_found);
        assert!(!outcome.preuninst_script_found);
        assert!(!outcome.postinst_script_found);
        assert!(outcome.postuninst_script_found);
    }

    /// Missing wire fields deserialise to empty defaults rather than failing.
    #[test]
    fn test_sparse_report_deserialises_with_defaults() {
        let report = report_from_json(json!({
            "backend": {},
            "frontend": {},
            "tests": {},
            "scripts": {},
            "changelog": {}
        }));
        let outcome = CheckOutcome::from_report(report);
        assert_eq!(outcome.errors_count, 0);
        assert_eq!(outcome.warnings_count, 0);
        // Empty version strings match, and unreleased defaults to false.
        assert!(outcome.version_ok);
    }

    /// Documentation payload deserialises with renamed `type` fields and
    /// sorted command iteration.
    #[test]
    fn test_documentation_report_deserialises() {
        let report: DocumentationReport = serde_json::from_value(json!({
            "doc": {
                "zeta": {"args": [], "returns": [], "raises": []},
                "alpha": {
                    "args": [{
                        "name": "device_uuid",
                        "type": "str",
                        "optional": true,
                        "default": "none",
                        "description": "Device identifier",
                        "formats": ["uuid4"]
                    }],
                    "returns": [{"type": "bool", "description": "ok", "formats": []}],
                    "raises": [{"type": "CommandError", "description": "boom"}]
                }
            },
            "check": {"alpha": {"errors": [], "warnings": ["short description"]}},
            "valid": true
        }))
        .expect("documentation report should deserialise");

        assert!(report.valid);
        let names: Vec<_> = report.doc.keys().cloned().collect();
        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
        let alpha = &report.doc["alpha"];
        assert_eq!(alpha.args[0].type_name, "str");
        assert!(alpha.args[0].optional);
    }
}
