// Single-owner message hub
//
// All client and room state lives inside one `Hub` task. Everything else talks
// to it through a cloneable `HubHandle`, which only ever sends commands.

// Public API
pub use actor::{Hub, HubCommand};
pub use client::{ClientHandle, ClientId};
pub use handle::{HubError, HubHandle};

// Internal modules
mod actor;
mod client;
mod handle;
