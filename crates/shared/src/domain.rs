use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

impl EmployeeId {
    /// Placeholder ids are handed out locally for drafts and are always negative.
    pub fn is_placeholder(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Approval workflow state reported by the backend.
///
/// Wire values the client does not know are kept in [`EmployeeStatus::Other`] so
/// that an update round-trips them untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmployeeStatus {
    Unsaved,
    #[default]
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Other(String),
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unsaved => "Unsaved",
            Self::Draft => "Draft",
            Self::PendingApproval => "Pending_Approval",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for EmployeeStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Unsaved" => Self::Unsaved,
            "Draft" => Self::Draft,
            "Pending_Approval" => Self::PendingApproval,
            "Approved" => Self::Approved,
            "Rejected" => Self::Rejected,
            _ => Self::Other(value),
        }
    }
}

impl From<EmployeeStatus> for String {
    fn from(value: EmployeeStatus) -> Self {
        match value {
            EmployeeStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
