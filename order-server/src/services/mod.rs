//! Collaborating services
//!
//! - [`clock`] - injectable time source
//! - [`privilege`] - privileged-role lookup
//! - [`notification`] - user notifications
//! - [`hooks`] - post-commit side-effect dispatch
//! - [`https`] - HTTP application assembly

pub mod clock;
pub mod hooks;
pub mod https;
pub mod notification;
pub mod privilege;

pub use clock::{Clock, ManualClock, SystemClock};
pub use hooks::{PostCommitHook, SideEffects};
pub use notification::{BusNotifier, Notification, NotificationService, NotifyError};
pub use privilege::{AdminList, PrivilegeLookup};
