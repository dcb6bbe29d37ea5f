//! AutoYaST Network Core
//!
//! Profile document model and the network edits applied to it

pub mod document;
pub mod error;
pub mod interface;
pub mod route;
pub mod types;
pub mod xml;

pub use document::ProfileDocument;
pub use error::ProfileError;
pub use interface::{add_vlan_interface, set_interface_mtu, vlan_device_name, InterfaceEntry};
pub use route::{add_route, RouteEntry};
pub use types::*;

/// Result type for profile operations
pub type Result<T> = std::result::Result<T, ProfileError>;
