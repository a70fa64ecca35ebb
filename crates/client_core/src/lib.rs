//! Client side of the employee roster: HTTP access to the backend and the
//! draft/commit view that sits on top of it.

pub mod client;
pub mod error;
pub mod form;
pub mod render;
pub mod view;

pub use client::{EmployeeClient, EmployeeStore, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use form::{CreationDialog, EmployeeForm, FormError};
pub use view::{
    Notification, NotificationLevel, Overlay, RosterState, RosterView, SaveOutcome, SaveReport,
    ViewError, ViewEvent,
};
