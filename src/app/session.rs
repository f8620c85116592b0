// DevPanel - app/session.rs
//
// The developer-dashboard session view-model. Owns all per-session state
// (selection, check outcome, output buffers, rendered fragments), wraps
// every backend operation, and reduces incoming push events into the
// buffers. The host shell renders this state and drains the notification
// outbox; the session never touches presentation itself.
//
// Invariant: `loading` is true only while exactly one operation is in
// flight, and is cleared on both the success and the failure path of that
// operation. The guard is advisory: an operation started while another is
// in flight is rejected locally without any remote call.

use crate::app::registry::{
    find_remotedev_device, selectable_applications, DeveloperConfig, ModuleRegistry,
};
use crate::core::model::{
    BreakingChangesReport, CheckOutcome, CheckReport, DashboardTab, DocumentationReport,
    Notification, NotificationLevel, RemotedevDevice,
};
use crate::core::render;
use crate::platform::config::PanelConfig;
use crate::rpc::client::{decode_response, RpcClient};
use crate::rpc::commands::{
    self, BUILD_APPLICATION, CHECK_APPLICATION, CREATE_APPLICATION, DETECT_BREAKING_CHANGES,
    DOWNLOAD_API_DOCUMENTATION, DOWNLOAD_APPLICATION, GENERATE_API_DOCUMENTATION,
    GENERATE_DOCUMENTATION, GET_LAST_COVERAGE_REPORT, LAUNCH_TESTS,
    SELECT_APPLICATION_FOR_DEVELOPMENT, START_REMOTEDEV, STOP_REMOTEDEV,
};
use crate::rpc::events::{DeveloperEvent, EventSubscription};
use crate::util::error::{BuildError, DevPanelError, Result};
use serde_json::Value;

// =============================================================================
// Session
// =============================================================================

/// Per-session state of the developer dashboard.
#[derive(Debug)]
pub struct DeveloperSession {
    /// Application currently selected for development (backend-owned; only
    /// updated from a reloaded registry config, never optimistically).
    selected_application: Option<String>,

    /// Applications the user may pick in the selector, sorted by name.
    applications: Vec<String>,

    /// Whether core/locked applications are included in the selector.
    god_mode: bool,

    /// True while exactly one operation is in flight.
    loading: bool,

    /// Last operation failure, kept for display until the next attempt.
    last_error: Option<String>,

    /// Outcome of the last successful analyze, with derived aggregates.
    check: Option<CheckOutcome>,

    /// Unit-test / coverage output lines, in delivery order.
    tests_output: Vec<String>,

    /// Documentation-generation output lines, in delivery order.
    docs_output: Vec<String>,

    /// Rendered documentation HTML fragment.
    docs_html: String,

    /// Last breaking-changes report, if any.
    breaking_changes: Option<BreakingChangesReport>,

    /// Currently active dashboard tab.
    active_tab: DashboardTab,

    /// Remote-development helper device, when registered on the hub.
    device: Option<RemotedevDevice>,

    /// Set when the backend asked the dashboard to reload itself.
    restart_requested: bool,

    /// Notification outbox drained by the host shell.
    notifications: Vec<Notification>,

    /// Cap on lines retained per output buffer.
    max_output_lines: usize,
}

impl DeveloperSession {
    /// Create an empty session from validated configuration.
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            selected_application: None,
            applications: Vec::new(),
            god_mode: false,
            loading: false,
            last_error: None,
            check: None,
            tests_output: Vec::new(),
            docs_output: Vec::new(),
            docs_html: String::new(),
            breaking_changes: None,
            active_tab: DashboardTab::default(),
            device: None,
            restart_requested: false,
            notifications: Vec::new(),
            max_output_lines: config.max_output_lines,
        }
    }

    // -------------------------------------------------------------------------
    // State accessors
    // -------------------------------------------------------------------------

    pub fn selected_application(&self) -> Option<&str> {
        self.selected_application.as_deref()
    }

    pub fn applications(&self) -> &[String] {
        &self.applications
    }

    pub fn god_mode(&self) -> bool {
        self.god_mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn check(&self) -> Option<&CheckOutcome> {
        self.check.as_ref()
    }

    pub fn tests_output(&self) -> &[String] {
        &self.tests_output
    }

    pub fn docs_output(&self) -> &[String] {
        &self.docs_output
    }

    pub fn docs_html(&self) -> &str {
        &self.docs_html
    }

    pub fn breaking_changes(&self) -> Option<&BreakingChangesReport> {
        self.breaking_changes.as_ref()
    }

    /// Render the last breaking-changes report as an HTML fragment.
    pub fn breaking_changes_html(&self) -> Option<String> {
        self.breaking_changes
            .as_ref()
            .map(render::breaking_changes_to_html)
    }

    pub fn active_tab(&self) -> DashboardTab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: DashboardTab) {
        self.active_tab = tab;
    }

    pub fn device(&self) -> Option<&RemotedevDevice> {
        self.device.as_ref()
    }

    /// True once the backend requested a dashboard reload. Consumes the
    /// flag; the host reloads after its own delay.
    pub fn take_restart_request(&mut self) -> bool {
        std::mem::take(&mut self.restart_requested)
    }

    /// Drain the notification outbox, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // -------------------------------------------------------------------------
    // Initialisation and selection
    // -------------------------------------------------------------------------

    /// Initialise the session from the hub registry: resolve the
    /// remote-development device, load the developer config, and build the
    /// selectable application list.
    ///
    /// When the configured in-development application is not part of the
    /// normal list (a core application selected earlier), god mode is
    /// re-enabled automatically so the selection stays visible.
    pub fn initialize(&mut self, registry: &dyn ModuleRegistry) -> Result<()> {
        self.device = find_remotedev_device(&registry.devices()?).map(|device| RemotedevDevice {
            uuid: device.uuid.clone(),
            running: false,
        });

        let config = registry.developer_config()?;
        self.apply_config(config);

        let inventory = registry.applications()?;
        self.applications = selectable_applications(&inventory, self.god_mode);

        if let Some(selected) = &self.selected_application {
            if !self.applications.contains(selected) {
                tracing::info!(
                    application = %selected,
                    "Selected application is core-only; enabling god mode"
                );
                self.god_mode = true;
                self.applications = selectable_applications(&inventory, true);
            }
        }

        tracing::debug!(
            applications = self.applications.len(),
            device = self.device.is_some(),
            "Session initialised"
        );
        Ok(())
    }

    /// Reveal core/locked applications in the selector.
    pub fn enable_god_mode(&mut self, registry: &dyn ModuleRegistry) -> Result<()> {
        self.god_mode = true;
        self.applications = selectable_applications(&registry.applications()?, true);
        self.notify(
            NotificationLevel::Info,
            "God mode activated, all applications are available in list",
        );
        Ok(())
    }

    /// Select an application for development (empty name disables).
    ///
    /// The selection is backend-owned: after the command succeeds the
    /// config is reloaded through the registry and the reloaded value is
    /// what the session reports, never the optimistic one.
    pub fn select_application(
        &mut self,
        client: &dyn RpcClient,
        registry: &dyn ModuleRegistry,
        name: &str,
    ) -> Result<()> {
        if !name.is_empty() && !self.applications.iter().any(|app| app == name) {
            let message = format!("Unknown application '{name}'");
            self.notify(NotificationLevel::Error, &message);
            return Err(DevPanelError::Validation { message });
        }

        self.begin_operation("select_application")?;
        let result = self.select_application_inner(client, registry, name);
        self.loading = false;
        result
    }

    fn select_application_inner(
        &mut self,
        client: &dyn RpcClient,
        registry: &dyn ModuleRegistry,
        name: &str,
    ) -> Result<()> {
        tracing::info!(application = name, "Selecting application for development");

        if let Err(e) = client
            .send_command(
                &SELECT_APPLICATION_FOR_DEVELOPMENT,
                commands::module_payload(name),
            )
            .and_then(|response| response.into_data(&SELECT_APPLICATION_FOR_DEVELOPMENT))
        {
            self.record_failure(e.to_string());
            self.notify(NotificationLevel::Error, e.to_string());
            return Err(e.into());
        }

        let config = registry.reload_developer_config()?;
        self.apply_config(config);

        match &self.selected_application {
            Some(selected) => {
                let message = format!("App \"{selected}\" selected for development");
                self.notify(NotificationLevel::Success, &message);
            }
            None => self.notify(NotificationLevel::Success, "Development disabled"),
        }
        Ok(())
    }

    fn apply_config(&mut self, config: DeveloperConfig) {
        self.selected_application = config.application_in_dev;
    }

    /// Request a new application skeleton on the hub.
    pub fn create_application(&mut self, client: &dyn RpcClient, name: &str) -> Result<()> {
        if name.is_empty() {
            let message = "Please set an application name".to_string();
            self.notify(NotificationLevel::Error, &message);
            return Err(DevPanelError::Validation { message });
        }

        self.begin_operation("create_application")?;
        let result = client
            .send_command(&CREATE_APPLICATION, commands::module_payload(name))
            .and_then(|response| response.into_data(&CREATE_APPLICATION));
        self.loading = false;

        match result {
            Ok(_) => {
                self.notify(
                    NotificationLevel::Success,
                    "Application skeleton created. Download code on your editor.",
                );
                Ok(())
            }
            Err(e) => {
                self.record_failure(e.to_string());
                self.notify(NotificationLevel::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Analyze and build
    // -------------------------------------------------------------------------

    /// Run static analysis on the selected application and store the
    /// outcome with its derived aggregates.
    ///
    /// Fails fast with an error notification when no application is
    /// selected, without issuing any remote call. On failure the previous
    /// outcome is retained and the error is recorded for display.
    pub fn analyze(&mut self, client: &dyn RpcClient) -> Result<()> {
        self.begin_operation("analyze")?;

        let name = match self.require_selection() {
            Ok(name) => name,
            Err(e) => {
                self.loading = false;
                return Err(e);
            }
        };

        tracing::info!(application = %name, "Analyzing application");
        let result = client
            .send_command(&CHECK_APPLICATION, commands::module_payload(&name))
            .and_then(|response| decode_response::<CheckReport>(response, &CHECK_APPLICATION));
        self.loading = false;

        match result {
            Ok(report) => {
                let outcome = CheckOutcome::from_report(report);
                tracing::info!(
                    errors = outcome.errors_count,
                    warnings = outcome.warnings_count,
                    version_ok = outcome.version_ok,
                    "Analysis completed"
                );
                self.check = Some(outcome);
                self.last_error = None;
                self.active_tab = DashboardTab::Build;
                Ok(())
            }
            Err(e) => {
                // Previous outcome stays visible while the error is shown.
                self.record_failure(e.to_string());
                self.notify(NotificationLevel::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Build the application package then download it, as a strict
    /// two-step chain.
    ///
    /// Requires a prior successful analyze. A build-step failure is
    /// reported once here and surfaces as `BuildError::Upstream`; the
    /// download step is never invoked after it. A download-step failure is
    /// reported distinctly and carries its cause.
    pub fn build(&mut self, client: &dyn RpcClient) -> std::result::Result<(), BuildError> {
        if self.check.is_none() {
            // Silent: the host disables the action until an analyze ran.
            return Err(BuildError::Validation {
                message: "No analysis result available".to_string(),
            });
        }
        let name = match self.require_selection() {
            Ok(name) => name,
            Err(e) => {
                return Err(BuildError::Validation {
                    message: e.to_string(),
                })
            }
        };
        if let Err(e) = self.begin_operation("build") {
            return Err(BuildError::Validation {
                message: e.to_string(),
            });
        }

        let result = self.build_inner(client, &name);
        self.loading = false;
        result
    }

    fn build_inner(
        &mut self,
        client: &dyn RpcClient,
        name: &str,
    ) -> std::result::Result<(), BuildError> {
        tracing::info!(application = name, "Building application package");

        if let Err(e) = client
            .send_command(&BUILD_APPLICATION, commands::module_payload(name))
            .and_then(|response| response.into_data(&BUILD_APPLICATION))
        {
            // Reported here, once. Upstream tells the caller the chain
            // stopped without a second notification being owed.
            self.record_failure(e.to_string());
            self.notify(NotificationLevel::Error, e.to_string());
            return Err(BuildError::Upstream);
        }

        tracing::info!(application = name, "Build completed, downloading package");
        if let Err(cause) = client.download(&DOWNLOAD_APPLICATION, commands::empty_payload()) {
            self.record_failure(cause.to_string());
            self.notify(NotificationLevel::Error, "Download failed");
            return Err(BuildError::Download { cause });
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Tests and coverage
    // -------------------------------------------------------------------------

    /// Launch the application's unit tests. Output arrives incrementally
    /// via push events; the buffer is cleared before the run starts.
    pub fn run_tests(&mut self, client: &dyn RpcClient) -> Result<()> {
        self.streamed_command(client, &LAUNCH_TESTS, BufferKind::Tests, |data| {
            is_truthy(data).then_some("Unit tests running...")
        })
    }

    /// Replay the last coverage report into the tests output stream.
    pub fn coverage_report(&mut self, client: &dyn RpcClient) -> Result<()> {
        self.streamed_command(client, &GET_LAST_COVERAGE_REPORT, BufferKind::Tests, |data| {
            is_truthy(data).then_some("Last report will be displayed in test output in few seconds")
        })
    }

    // -------------------------------------------------------------------------
    // Documentation
    // -------------------------------------------------------------------------

    /// Generate command documentation and render it to an HTML fragment.
    /// The payload's `valid` verdict drives a validity notification.
    pub fn generate_documentation(&mut self, client: &dyn RpcClient) -> Result<()> {
        self.begin_operation("generate_documentation")?;

        let name = match self.require_selection() {
            Ok(name) => name,
            Err(e) => {
                self.loading = false;
                return Err(e);
            }
        };

        self.reset_doc_buffers();
        tracing::info!(application = %name, "Generating documentation");
        let result = client
            .send_command(&GENERATE_DOCUMENTATION, commands::module_payload(&name))
            .and_then(|response| {
                decode_response::<DocumentationReport>(response, &GENERATE_DOCUMENTATION)
            });
        self.loading = false;

        match result {
            Ok(report) => {
                self.docs_html = render::doc_check_to_html(&report.doc, &report.check);
                if report.valid {
                    self.notify(NotificationLevel::Success, "Documentation is valid");
                } else {
                    self.notify(NotificationLevel::Error, "Documentation is not valid");
                }
                self.active_tab = DashboardTab::Documentation;
                Ok(())
            }
            Err(e) => {
                self.record_failure(e.to_string());
                self.notify(NotificationLevel::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Generate API documentation. Output arrives via push events.
    pub fn generate_api_documentation(&mut self, client: &dyn RpcClient) -> Result<()> {
        self.streamed_command(client, &GENERATE_API_DOCUMENTATION, BufferKind::Docs, |_| None)
    }

    /// Download the generated API documentation bundle.
    pub fn download_api_documentation(&mut self, client: &dyn RpcClient) -> Result<()> {
        self.begin_operation("download_api_documentation")?;

        let name = match self.require_selection() {
            Ok(name) => name,
            Err(e) => {
                self.loading = false;
                return Err(e);
            }
        };

        self.reset_doc_buffers();
        let result = client.download(&DOWNLOAD_API_DOCUMENTATION, commands::module_payload(&name));
        self.loading = false;

        if let Err(e) = result {
            self.record_failure(e.to_string());
            self.notify(NotificationLevel::Error, "Download failed");
            return Err(e.into());
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Breaking changes
    // -------------------------------------------------------------------------

    /// Compare the selected application against its published version and
    /// replace the breaking-changes report.
    pub fn detect_breaking_changes(&mut self, client: &dyn RpcClient) -> Result<()> {
        self.begin_operation("detect_breaking_changes")?;

        let name = match self.require_selection() {
            Ok(name) => name,
            Err(e) => {
                self.loading = false;
                return Err(e);
            }
        };

        tracing::info!(application = %name, "Detecting breaking changes");
        let result = client
            .send_command(&DETECT_BREAKING_CHANGES, commands::module_payload(&name))
            .and_then(|response| {
                decode_response::<BreakingChangesReport>(response, &DETECT_BREAKING_CHANGES)
            });
        self.loading = false;

        match result {
            Ok(report) => {
                self.breaking_changes = Some(report);
                Ok(())
            }
            Err(e) => {
                self.record_failure(e.to_string());
                self.notify(NotificationLevel::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Remote development
    // -------------------------------------------------------------------------

    /// Start the remote-development helper service.
    pub fn start_remotedev(&mut self, client: &dyn RpcClient) -> Result<()> {
        self.toggle_remotedev(client, &START_REMOTEDEV, true)
    }

    /// Stop the remote-development helper service.
    pub fn stop_remotedev(&mut self, client: &dyn RpcClient) -> Result<()> {
        self.toggle_remotedev(client, &STOP_REMOTEDEV, false)
    }

    fn toggle_remotedev(
        &mut self,
        client: &dyn RpcClient,
        command: &commands::CommandSpec,
        running: bool,
    ) -> Result<()> {
        if self.device.is_none() {
            let message = "No remote-development device registered".to_string();
            self.notify(NotificationLevel::Error, &message);
            return Err(DevPanelError::Validation { message });
        }

        self.begin_operation(command.name)?;
        let result = client
            .send_command(command, commands::empty_payload())
            .and_then(|response| response.into_data(command));
        self.loading = false;

        match result {
            Ok(data) => {
                // The flag mirrors backend state: flipped only on a
                // confirmed truthy response.
                if is_truthy(&data) {
                    if let Some(device) = &mut self.device {
                        device.running = running;
                    }
                    tracing::info!(running, "Remote development toggled");
                }
                Ok(())
            }
            Err(e) => {
                self.record_failure(e.to_string());
                self.notify(NotificationLevel::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Push events
    // -------------------------------------------------------------------------

    /// Reduce one push event into session state.
    ///
    /// Pure state transition: appends in delivery order, drops the oldest
    /// lines past the buffer cap, never reorders.
    pub fn apply_event(&mut self, event: DeveloperEvent) {
        match event {
            DeveloperEvent::FrontendRestart => {
                tracing::info!("Dashboard restart requested by backend");
                self.restart_requested = true;
            }
            DeveloperEvent::TestsOutput { messages } => {
                append_capped(&mut self.tests_output, messages, self.max_output_lines);
            }
            DeveloperEvent::DocsOutput { messages } => {
                append_capped(&mut self.docs_output, messages, self.max_output_lines);
            }
        }
    }

    /// Drain the subscription and reduce every drained event.
    pub fn pump_events(&mut self, subscription: &EventSubscription) {
        for event in subscription.try_drain() {
            self.apply_event(event);
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Common shape of the fire-and-stream commands (tests, coverage, API
    /// docs): clear the target buffer, issue the command, optionally notify
    /// from the response data. Progress then arrives via push events.
    fn streamed_command(
        &mut self,
        client: &dyn RpcClient,
        command: &commands::CommandSpec,
        buffer: BufferKind,
        notification: impl FnOnce(&Value) -> Option<&'static str>,
    ) -> Result<()> {
        self.begin_operation(command.name)?;

        let name = match self.require_selection() {
            Ok(name) => name,
            Err(e) => {
                self.loading = false;
                return Err(e);
            }
        };

        // Cleared before the RPC so a failed call still starts from a
        // blank buffer on retry.
        match buffer {
            BufferKind::Tests => self.tests_output.clear(),
            BufferKind::Docs => self.reset_doc_buffers(),
        }

        tracing::info!(application = %name, command = command.name, "Starting streamed command");
        let result = client
            .send_command(command, commands::module_payload(&name))
            .and_then(|response| response.into_data(command));
        self.loading = false;

        match result {
            Ok(data) => {
                if let Some(message) = notification(&data) {
                    self.notify(NotificationLevel::Success, message);
                }
                Ok(())
            }
            Err(e) => {
                self.record_failure(e.to_string());
                self.notify(NotificationLevel::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    fn begin_operation(&mut self, name: &'static str) -> Result<()> {
        if self.loading {
            let message = format!("'{name}' rejected: another operation is in flight");
            tracing::warn!("{}", message);
            return Err(DevPanelError::Validation { message });
        }
        self.loading = true;
        Ok(())
    }

    fn require_selection(&mut self) -> Result<String> {
        match &self.selected_application {
            Some(name) => Ok(name.clone()),
            None => {
                let message = "Please select an application".to_string();
                self.notify(NotificationLevel::Error, &message);
                Err(DevPanelError::Validation { message })
            }
        }
    }

    fn reset_doc_buffers(&mut self) {
        self.docs_output.clear();
        self.docs_html.clear();
    }

    fn record_failure(&mut self, message: String) {
        tracing::warn!(error = %message, "Operation failed");
        self.last_error = Some(message);
    }

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }
}

/// Target buffer of a streamed command.
#[derive(Debug, Clone, Copy)]
enum BufferKind {
    Tests,
    Docs,
}

/// Append preserving delivery order, dropping the oldest lines once the
/// cap is exceeded.
fn append_capped(buffer: &mut Vec<String>, messages: Vec<String>, cap: usize) {
    buffer.extend(messages);
    if buffer.len() > cap {
        let excess = buffer.len() - cap;
        buffer.drain(..excess);
    }
}

/// Truthiness of a response `data` value (null, false, 0, "" are falsy;
/// arrays and objects are always truthy).
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// =============================================================================
// Unit tests
// =============================================================================
