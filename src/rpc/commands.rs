// DevPanel - rpc/commands.rs
//
// The command table of the developer module: command names, target module,
// and per-command timeouts. This table is the wire contract the session
// speaks; transports receive a `CommandSpec` and must honour its timeout.

use crate::util::constants;
use serde_json::{json, Value};
use std::time::Duration;

/// A single command of the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Wire command name.
    pub name: &'static str,

    /// Target module on the RPC bus.
    pub module: &'static str,

    /// Per-command timeout; `None` means the transport default.
    pub timeout: Option<Duration>,
}

const fn command(name: &'static str, timeout_secs: Option<u64>) -> CommandSpec {
    CommandSpec {
        name,
        module: constants::DEVELOPER_MODULE,
        timeout: match timeout_secs {
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        },
    }
}

/// Run static analysis/lint checks on an application.
pub const CHECK_APPLICATION: CommandSpec = command(
    "check_application",
    Some(constants::CHECK_APPLICATION_TIMEOUT_SECS),
);

/// Build a distributable application package.
pub const BUILD_APPLICATION: CommandSpec = command(
    "build_application",
    Some(constants::BUILD_APPLICATION_TIMEOUT_SECS),
);

/// Persist the "selected for development" flag on the backend.
pub const SELECT_APPLICATION_FOR_DEVELOPMENT: CommandSpec = command(
    "select_application_for_development",
    Some(constants::SELECT_APPLICATION_TIMEOUT_SECS),
);

/// Create a new application skeleton.
pub const CREATE_APPLICATION: CommandSpec = command(
    "create_application",
    Some(constants::CREATE_APPLICATION_TIMEOUT_SECS),
);

/// Launch the application's unit tests (output arrives via push events).
pub const LAUNCH_TESTS: CommandSpec = command("launch_tests", None);

/// Replay the last coverage report into the tests output stream.
pub const GET_LAST_COVERAGE_REPORT: CommandSpec = command("get_last_coverage_report", None);

/// Generate API documentation (output arrives via push events).
pub const GENERATE_API_DOCUMENTATION: CommandSpec = command("generate_api_documentation", None);

/// Generate command documentation; returns a `{doc, check, valid}` payload.
pub const GENERATE_DOCUMENTATION: CommandSpec = command(
    "generate_documentation",
    Some(constants::GENERATE_DOCUMENTATION_TIMEOUT_SECS),
);

/// Compare against the published version and report breaking changes.
pub const DETECT_BREAKING_CHANGES: CommandSpec = command(
    "detect_breaking_changes",
    Some(constants::DETECT_BREAKING_CHANGES_TIMEOUT_SECS),
);

/// Start the remote-development helper service.
pub const START_REMOTEDEV: CommandSpec =
    command("start_remotedev", Some(constants::REMOTEDEV_TIMEOUT_SECS));

/// Stop the remote-development helper service.
pub const STOP_REMOTEDEV: CommandSpec =
    command("stop_remotedev", Some(constants::REMOTEDEV_TIMEOUT_SECS));

/// Download the built application package (file fetch, not JSON).
pub const DOWNLOAD_APPLICATION: CommandSpec = command("download_application", None);

/// Download the generated API documentation (file fetch, not JSON).
pub const DOWNLOAD_API_DOCUMENTATION: CommandSpec = command("download_api_documentation", None);

/// Payload carrying the target application name.
pub fn module_payload(module_name: &str) -> Value {
    json!({ "module_name": module_name })
}

/// Payload for commands that take no parameters.
pub fn empty_payload() -> Value {
    json!({})
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every command targets the developer module.
    #[test]
    fn test_all_commands_target_developer_module() {
        for spec in [
            CHECK_APPLICATION,
            BUILD_APPLICATION,
            SELECT_APPLICATION_FOR_DEVELOPMENT,
            CREATE_APPLICATION,
            LAUNCH_TESTS,
            GET_LAST_COVERAGE_REPORT,
            GENERATE_API_DOCUMENTATION,
            GENERATE_DOCUMENTATION,
            DETECT_BREAKING_CHANGES,
            START_REMOTEDEV,
            STOP_REMOTEDEV,
            DOWNLOAD_APPLICATION,
            DOWNLOAD_API_DOCUMENTATION,
        ] {
            assert_eq!(spec.module, constants::DEVELOPER_MODULE, "{}", spec.name);
        }
    }

    /// Timeouts match the published contract table.
    #[test]
    fn test_contract_timeouts() {
        assert_eq!(CHECK_APPLICATION.timeout, Some(Duration::from_secs(30)));
        assert_eq!(BUILD_APPLICATION.timeout, Some(Duration::from_secs(60)));
        assert_eq!(
            SELECT_APPLICATION_FOR_DEVELOPMENT.timeout,
            Some(Duration::from_secs(10))
        );
        assert_eq!(CREATE_APPLICATION.timeout, Some(Duration::from_secs(10)));
        assert_eq!(LAUNCH_TESTS.timeout, None);
        assert_eq!(GET_LAST_COVERAGE_REPORT.timeout, None);
        assert_eq!(GENERATE_API_DOCUMENTATION.timeout, None);
        assert_eq!(
            GENERATE_DOCUMENTATION.timeout,
            Some(Duration::from_secs(15))
        );
        assert_eq!(
            DETECT_BREAKING_CHANGES.timeout,
            Some(Duration::from_secs(30))
        );
        assert_eq!(START_REMOTEDEV.timeout, Some(Duration::from_secs(15)));
        assert_eq!(STOP_REMOTEDEV.timeout, Some(Duration::from_secs(15)));
    }

    /// Payload helpers produce the exact wire shapes.
    #[test]
    fn test_payload_shapes() {
        assert_eq!(
            module_payload("lights").to_string(),
            r#"{"module_name":"lights"}"#
        );
        assert_eq!(empty_payload().to_string(), "{}");
    }
}
