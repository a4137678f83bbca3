//! External collaborators of a form submission
//!
//! The submit coordinator only knows these traits. Pages inject the real
//! effect (network call, upload, local store write) as an [`Action`].

mod recorder;
mod simulated;
mod traits;

pub use recorder::{NotificationLog, RouteRecorder};
pub use simulated::{SimulatedAction, TracingNotifier};
pub use traits::{Action, ActionError, Navigator, Notification, Notifier, Severity, SuccessPayload};

#[cfg(test)]
pub use traits::{MockAction, MockNavigator, MockNotifier};
