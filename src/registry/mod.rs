// Group registry and admin authority
pub mod admin;
pub mod group_registry;

pub use admin::AdminAuthority;
pub use group_registry::{GroupRecord, GroupRegistry, RootHistory};
