// DevPanel - lib.rs
//
// Developer-dashboard session layer for a home-automation hub: pick an
// installed application, run checks on it, build a distributable package,
// run its unit tests, generate documentation, and manage the
// remote-development helper device.
//
// This crate is a library; the host shell owns presentation. It drives a
// `DeveloperSession` with its own `RpcClient` and `ModuleRegistry`
// implementations, renders the session state, and drains the notification
// outbox.
//
// Layers:
//   - `core`     - pure data model and HTML fragment rendering
//   - `rpc`      - command table, response envelope, push-event channel
//   - `app`      - the `DeveloperSession` view-model and registry seam
//   - `platform` - config directories and config.toml validation
//   - `util`     - constants, typed errors, logging init

pub mod app;
pub mod core;
pub mod platform;
pub mod rpc;
pub mod util;

pub use app::registry::ModuleRegistry;
pub use app::session::DeveloperSession;
pub use rpc::client::RpcClient;
pub use util::error::{BuildError, DevPanelError, Result};
