// DevPanel - rpc/mod.rs
//
// Wire contract: command table, response envelope, and push events.

pub mod client;
pub mod commands;
pub mod events;
