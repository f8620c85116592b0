// DevPanel - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "DevPanel";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "DevPanel";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Backend command routing
// =============================================================================

/// Target module name for every developer command on the hub RPC bus.
pub const DEVELOPER_MODULE: &str = "developer";

/// Device type string identifying the remote-development helper device.
pub const DEVELOPER_DEVICE_TYPE: &str = "developer";

// =============================================================================
// Command timeouts (seconds)
// =============================================================================

/// Timeout for `check_application` (full static analysis of an application).
pub const CHECK_APPLICATION_TIMEOUT_SECS: u64 = 30;

/// Timeout for `build_application` (package assembly is the slowest command).
pub const BUILD_APPLICATION_TIMEOUT_SECS: u64 = 60;

/// Timeout for `select_application_for_development`.
pub const SELECT_APPLICATION_TIMEOUT_SECS: u64 = 10;

/// Timeout for `create_application` (skeleton generation).
pub const CREATE_APPLICATION_TIMEOUT_SECS: u64 = 10;

/// Timeout for `generate_documentation`.
pub const GENERATE_DOCUMENTATION_TIMEOUT_SECS: u64 = 15;

/// Timeout for `detect_breaking_changes`.
pub const DETECT_BREAKING_CHANGES_TIMEOUT_SECS: u64 = 30;

/// Timeout for `start_remotedev` / `stop_remotedev`.
pub const REMOTEDEV_TIMEOUT_SECS: u64 = 15;

// =============================================================================
// Push event names
// =============================================================================

/// Backend asks the dashboard to reload itself (e.g. after a frontend sync).
pub const EVENT_FRONTEND_RESTART: &str = "developer.frontend.restart";

/// Incremental unit-test / coverage output lines.
pub const EVENT_TESTS_OUTPUT: &str = "developer.tests.output";

/// Incremental documentation-generation output lines.
pub const EVENT_DOCS_OUTPUT: &str = "developer.docs.output";

// =============================================================================
// Output buffer limits
// =============================================================================

/// Default cap on lines retained per output buffer (tests/docs).
///
/// Push notifications are append-only for the lifetime of a run; a runaway
/// backend task must not grow the session without bound. Once the cap is
/// reached the oldest lines are dropped, preserving delivery order of the
/// remainder.
pub const DEFAULT_MAX_OUTPUT_LINES: usize = 10_000;

/// Minimum user-configurable output buffer cap.
pub const MIN_MAX_OUTPUT_LINES: usize = 100;

/// Maximum user-configurable output buffer cap.
pub const ABSOLUTE_MAX_OUTPUT_LINES: usize = 1_000_000;

// =============================================================================
// Per-drain event budgets
// =============================================================================

/// Maximum number of push events consumed by a single subscription drain.
/// Any remaining events stay queued for the next drain, preventing a burst
/// from stalling the host's render loop.
pub const DEFAULT_MAX_EVENTS_PER_DRAIN: usize = 200;

/// Minimum user-configurable drain budget.
pub const MIN_MAX_EVENTS_PER_DRAIN: usize = 1;

/// Maximum user-configurable drain budget.
pub const ABSOLUTE_MAX_EVENTS_PER_DRAIN: usize = 10_000;

// =============================================================================
// Check report conventions
// =============================================================================

/// Pre-install script filename surfaced by the check report.
pub const PREINST_SCRIPT: &str = "preinst.sh";

/// Pre-uninstall script filename surfaced by the check report.
pub const PREUNINST_SCRIPT: &str = "preuninst.sh";

/// Post-install script filename surfaced by the check report.
pub const POSTINST_SCRIPT: &str = "postinst.sh";

/// Post-uninstall script filename surfaced by the check report.
pub const POSTUNINST_SCRIPT: &str = "postuninst.sh";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
