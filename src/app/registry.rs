// DevPanel - app/registry.rs
//
// The module-registry collaborator seam. The hub keeps an inventory of
// installed applications, per-module configuration, and registered devices;
// the session reads all three through this trait and never caches across
// operations that mutate backend state.

use crate::util::constants;
use crate::util::error::DevPanelError;

/// One installed application as listed by the hub registry.
#[derive(Debug, Clone)]
pub struct ApplicationInfo {
    /// Application (module) name, unique on the hub.
    pub name: String,

    /// True for applications shipped with the hub itself.
    pub core: bool,
}

/// The developer module's own configuration entry in the registry.
#[derive(Debug, Clone, Default)]
pub struct DeveloperConfig {
    /// Application currently selected for development, if any.
    pub application_in_dev: Option<String>,
}

/// One registered device as listed by the hub registry.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Stable device identifier.
    pub uuid: String,

    /// Device type string (the remote-development helper is one of these).
    pub device_type: String,
}

/// Read access to the hub's module registry.
///
/// `reload_developer_config` forces the registry to re-read backend state;
/// the session calls it after `select_application_for_development` so the
/// selection it reports back is the one the backend actually persisted.
pub trait ModuleRegistry {
    /// All installed applications.
    fn applications(&self) -> Result<Vec<ApplicationInfo>, DevPanelError>;

    /// Current developer-module configuration.
    fn developer_config(&self) -> Result<DeveloperConfig, DevPanelError>;

    /// Refresh the developer-module configuration from backend state.
    fn reload_developer_config(&self) -> Result<DeveloperConfig, DevPanelError>;

    /// All registered devices.
    fn devices(&self) -> Result<Vec<DeviceInfo>, DevPanelError>;
}

/// Filter the registry inventory down to the applications a developer may
/// select, sorted by name.
///
/// Core applications and the developer module itself are hidden unless
/// `include_core` (god mode) is set.
pub fn selectable_applications(
    applications: &[ApplicationInfo],
    include_core: bool,
) -> Vec<String> {
    let mut names: Vec<String> = applications
        .iter()
        .filter(|app| include_core || (!app.core && app.name != constants::DEVELOPER_MODULE))
        .map(|app| app.name.clone())
        .collect();
    names.sort();
    names
}

/// Locate the remote-development helper device in the registry inventory.
pub fn find_remotedev_device(devices: &[DeviceInfo]) -> Option<&DeviceInfo> {
    devices
        .iter()
        .find(|device| device.device_type == constants::DEVELOPER_DEVICE_TYPE)
}
