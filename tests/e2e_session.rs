// DevPanel - tests/e2e_session.rs
//
// End-to-end tests for the developer session workflow.
//
// These tests drive a real `DeveloperSession` against a stateful in-memory
// backend that implements both collaborator seams (`RpcClient` and
// `ModuleRegistry`) and a real push-event channel. No session internals are
// touched: everything goes through the public API, the way a host shell
// would drive it.

use devpanel::app::registry::{ApplicationInfo, DeveloperConfig, DeviceInfo, ModuleRegistry};
use devpanel::app::session::DeveloperSession;
use devpanel::core::model::{DashboardTab, NotificationLevel};
use devpanel::platform::config::PanelConfig;
use devpanel::rpc::client::{RpcClient, RpcResponse};
use devpanel::rpc::commands::CommandSpec;
use devpanel::rpc::events::{event_channel, parse_event, EventPublisher};
use devpanel::util::error::{BuildError, DevPanelError, RpcError};
use serde_json::{json, Value};
use std::cell::RefCell;

// =============================================================================
// In-memory backend
// =============================================================================

/// A stateful hub backend: answers RPC commands, persists the developer
/// selection, tracks the remotedev service, and streams output over the
/// push channel like the real backend does.
struct FakeHub {
    application_in_dev: RefCell<Option<String>>,
    remotedev_running: RefCell<bool>,
    fail_build: bool,
    commands_seen: RefCell<Vec<String>>,
    downloads_seen: RefCell<Vec<String>>,
    publisher: EventPublisher,
}

impl FakeHub {
    fn new(publisher: EventPublisher) -> Self {
        Self {
            application_in_dev: RefCell::new(None),
            remotedev_running: RefCell::new(false),
            fail_build: false,
            commands_seen: RefCell::new(Vec::new()),
            downloads_seen: RefCell::new(Vec::new()),
            publisher,
        }
    }

    fn push(&self, event_name: &str, params: Value) {
        let event = parse_event(event_name, &params).expect("known event name");
        assert!(self.publisher.publish(event), "subscription dropped");
    }
}

impl RpcClient for FakeHub {
    fn send_command(
        &self,
        command: &CommandSpec,
        payload: Value,
    ) -> Result<RpcResponse, RpcError> {
        self.commands_seen.borrow_mut().push(command.name.to_string());

        let module_name = payload
            .get("module_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let data = match command.name {
            "select_application_for_development" => {
                *self.application_in_dev.borrow_mut() = if module_name.is_empty() {
                    None
                } else {
                    Some(module_name)
                };
                Value::Null
            }
            "check_application" => json!({
                "backend": {
                    "errors": [],
                    "warnings": ["variable never used"],
                    "metadata": {"version": "2.1.0", "longdescription": "<p>Weather app</p>"}
                },
                "frontend": {"errors": [], "warnings": []},
                "tests": {"errors": [], "warnings": []},
                "scripts": {"errors": [], "warnings": [], "files": [{"filename": "postinst.sh"}]},
                "changelog": {"unreleased": false, "version": "2.1.0"}
            }),
            "build_application" => {
                if self.fail_build {
                    return Ok(RpcResponse {
                        data: Value::Null,
                        error: Some("packaging failed".to_string()),
                    });
                }
                Value::Null
            }
            "launch_tests" => {
                self.push(
                    "developer.tests.output",
                    json!({"messages": ["collecting tests"]}),
                );
                self.push(
                    "developer.tests.output",
                    json!({"messages": ["2 passed", "0 failed"]}),
                );
                json!(true)
            }
            "get_last_coverage_report" => {
                self.push(
                    "developer.tests.output",
                    json!({"messages": ["TOTAL 94%"]}),
                );
                json!(true)
            }
            "generate_documentation" => json!({
                "doc": {
                    "get_forecast": {
                        "args": [{
                            "name": "city",
                            "type": "str",
                            "optional": false,
                            "default": null,
                            "description": "City name",
                            "formats": []
                        }],
                        "returns": [{"type": "dict", "description": "Forecast data", "formats": []}],
                        "raises": []
                    }
                },
                "check": {"get_forecast": {"errors": [], "warnings": ["missing example"]}},
                "valid": true
            }),
            "generate_api_documentation" => {
                self.push(
                    "developer.docs.output",
                    json!({"messages": ["building html pages"]}),
                );
                json!(true)
            }
            "detect_breaking_changes" => json!({"errors": [], "warnings": ["renamed field"]}),
            "start_remotedev" => {
                *self.remotedev_running.borrow_mut() = true;
                json!(true)
            }
            "stop_remotedev" => {
                *self.remotedev_running.borrow_mut() = false;
                json!(true)
            }
            "create_application" => Value::Null,
            other => panic!("unexpected command '{other}'"),
        };

        Ok(RpcResponse { data, error: None })
    }

    fn download(&self, command: &CommandSpec, _payload: Value) -> Result<(), RpcError> {
        self.downloads_seen.borrow_mut().push(command.name.to_string());
        Ok(())
    }
}

impl ModuleRegistry for FakeHub {
    fn applications(&self) -> Result<Vec<ApplicationInfo>, DevPanelError> {
        Ok(vec![
            ApplicationInfo {
                name: "weather".to_string(),
                core: false,
            },
            ApplicationInfo {
                name: "network".to_string(),
                core: true,
            },
        ])
    }

    fn developer_config(&self) -> Result<DeveloperConfig, DevPanelError> {
        Ok(DeveloperConfig {
            application_in_dev: self.application_in_dev.borrow().clone(),
        })
    }

    fn reload_developer_config(&self) -> Result<DeveloperConfig, DevPanelError> {
        self.developer_config()
    }

    fn devices(&self) -> Result<Vec<DeviceInfo>, DevPanelError> {
        Ok(vec![DeviceInfo {
            uuid: "remotedev-1".to_string(),
            device_type: "developer".to_string(),
        }])
    }
}

// =============================================================================
// Full workflow E2E
// =============================================================================

/// A full developer workflow: initialise, select, analyze, build+download,
/// run tests with streamed output, generate docs, detect breaking changes,
/// toggle remote development.
#[test]
fn e2e_full_developer_workflow() {
    let (publisher, subscription) = event_channel(50);
    let hub = FakeHub::new(publisher);
    let mut session = DeveloperSession::new(&PanelConfig::default());

    // Initialise: device resolved, core apps hidden.
    session.initialize(&hub).unwrap();
    assert_eq!(session.device().unwrap().uuid, "remotedev-1");
    assert_eq!(session.applications(), &["weather".to_string()]);

    // Select for development; the backend-persisted value is reported back.
    session.select_application(&hub, &hub, "weather").unwrap();
    assert_eq!(session.selected_application(), Some("weather"));

    // Analyze: derived aggregates computed, Build tab activated.
    session.analyze(&hub).unwrap();
    let outcome = session.check().unwrap();
    assert_eq!(outcome.errors_count, 0);
    assert_eq!(outcome.warnings_count, 1);
    assert!(outcome.version_ok);
    assert!(outcome.postinst_script_found);
    assert!(!outcome.preinst_script_found);
    assert_eq!(session.active_tab(), DashboardTab::Build);

    // Build: the chain runs build then download.
    session.build(&hub).unwrap();
    assert_eq!(
        hub.downloads_seen.borrow().as_slice(),
        &["download_application".to_string()]
    );

    // Tests: output streams in over the push channel.
    session.run_tests(&hub).unwrap();
    session.pump_events(&subscription);
    assert_eq!(
        session.tests_output(),
        &["collecting tests", "2 passed", "0 failed"]
    );

    // Coverage replay clears the previous run's output first.
    session.coverage_report(&hub).unwrap();
    session.pump_events(&subscription);
    assert_eq!(session.tests_output(), &["TOTAL 94%"]);

    // Documentation: rendered fragment plus validity notification.
    session.drain_notifications();
    session.generate_documentation(&hub).unwrap();
    assert!(session.docs_html().contains("Command get_forecast"));
    assert!(session.docs_html().contains("doc-warns"));
    let notifications = session.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Success);
    assert_eq!(notifications[0].message, "Documentation is valid");

    // Breaking changes: warnings itemised, errors reported as none.
    session.detect_breaking_changes(&hub).unwrap();
    let html = session.breaking_changes_html().unwrap();
    assert!(html.contains("No breaking change detected"));
    assert!(html.contains("renamed field"));

    // Remote development round trip.
    session.start_remotedev(&hub).unwrap();
    assert!(session.device().unwrap().running);
    assert!(*hub.remotedev_running.borrow());
    session.stop_remotedev(&hub).unwrap();
    assert!(!session.device().unwrap().running);

    // The session never leaves loading set.
    assert!(!session.is_loading());
}

/// A build failure stops the chain before the download and is reported
/// exactly once.
#[test]
fn e2e_build_failure_short_circuits_download() {
    let (publisher, _subscription) = event_channel(50);
    let mut hub = FakeHub::new(publisher);
    hub.fail_build = true;

    let mut session = DeveloperSession::new(&PanelConfig::default());
    session.initialize(&hub).unwrap();
    session.select_application(&hub, &hub, "weather").unwrap();
    session.analyze(&hub).unwrap();
    session.drain_notifications();

    let err = session.build(&hub).unwrap_err();
    assert!(matches!(err, BuildError::Upstream));
    assert!(hub.downloads_seen.borrow().is_empty());

    let errors: Vec<_> = session
        .drain_notifications()
        .into_iter()
        .filter(|n| n.level == NotificationLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1, "exactly one failure notification");
    assert!(!session.is_loading());
}

/// API documentation generation streams output into the doc buffer and a
/// backend restart request is surfaced to the host exactly once.
#[test]
fn e2e_api_documentation_and_restart_event() {
    let (publisher, subscription) = event_channel(50);
    let hub = FakeHub::new(publisher);

    let mut session = DeveloperSession::new(&PanelConfig::default());
    session.initialize(&hub).unwrap();
    session.select_application(&hub, &hub, "weather").unwrap();

    session.generate_api_documentation(&hub).unwrap();
    hub.push("developer.frontend.restart", json!({}));
    session.pump_events(&subscription);

    assert_eq!(session.docs_output(), &["building html pages"]);
    assert!(session.take_restart_request());
    assert!(!session.take_restart_request());

    // The API docs bundle downloads after a doc-buffer reset.
    session.download_api_documentation(&hub).unwrap();
    assert!(session.docs_output().is_empty());
    assert_eq!(
        hub.downloads_seen.borrow().as_slice(),
        &["download_api_documentation".to_string()]
    );
}

/// Selecting the empty name disables development and analyze then fails
/// fast without reaching the backend.
#[test]
fn e2e_disable_development_blocks_analyze() {
    let (publisher, _subscription) = event_channel(50);
    let hub = FakeHub::new(publisher);

    let mut session = DeveloperSession::new(&PanelConfig::default());
    session.initialize(&hub).unwrap();
    session.select_application(&hub, &hub, "weather").unwrap();
    session.select_application(&hub, &hub, "").unwrap();
    assert_eq!(session.selected_application(), None);

    let commands_before = hub.commands_seen.borrow().len();
    assert!(session.analyze(&hub).is_err());
    assert_eq!(hub.commands_seen.borrow().len(), commands_before);

    let messages: Vec<_> = session
        .drain_notifications()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert!(messages.contains(&"Please select an application".to_string()));
}
