use serde::{Deserialize, Serialize};

use crate::domain::{EmployeeId, EmployeeStatus};

/// Employee record as exchanged with the backend and shown in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EmployeeId>,
    pub full_name: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
    /// Local-only marker; never expected from the backend.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_unsaved: bool,
}

impl Employee {
    pub fn draft(id: EmployeeId, payload: NewEmployee) -> Self {
        Self {
            id: Some(id),
            full_name: payload.full_name,
            department: payload.department,
            status: Some(EmployeeStatus::Unsaved),
            is_unsaved: true,
        }
    }

    /// Status with the backend default applied.
    pub fn effective_status(&self) -> EmployeeStatus {
        self.status.clone().unwrap_or_default()
    }

    /// Create body for this record with id, status and the unsaved flag stripped.
    pub fn to_payload(&self) -> NewEmployee {
        NewEmployee {
            full_name: self.full_name.clone(),
            department: self.department.clone(),
        }
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub full_name: String,
    pub department: String,
}
