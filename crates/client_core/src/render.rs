//! Pure record-to-cell rendering for the roster table.

use shared::{
    domain::{EmployeeId, EmployeeStatus},
    protocol::Employee,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub css_class: &'static str,
    pub text: &'static str,
}

const UNSAVED_BADGE: StatusBadge = StatusBadge {
    css_class: "unsaved",
    text: "UNSAVED",
};
const DRAFT_BADGE: StatusBadge = StatusBadge {
    css_class: "draft",
    text: "DRAFT",
};
const PENDING_BADGE: StatusBadge = StatusBadge {
    css_class: "pending",
    text: "PENDING",
};
const APPROVED_BADGE: StatusBadge = StatusBadge {
    css_class: "approved",
    text: "APPROVED",
};
const REJECTED_BADGE: StatusBadge = StatusBadge {
    css_class: "rejected",
    text: "REJECTED",
};

/// Missing and unrecognized statuses both render as a draft badge.
pub fn status_badge(employee: &Employee) -> StatusBadge {
    match employee.effective_status() {
        EmployeeStatus::Unsaved => UNSAVED_BADGE,
        EmployeeStatus::Draft | EmployeeStatus::Other(_) => DRAFT_BADGE,
        EmployeeStatus::PendingApproval => PENDING_BADGE,
        EmployeeStatus::Approved => APPROVED_BADGE,
        EmployeeStatus::Rejected => REJECTED_BADGE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    WaitingToSave,
    Submit(Option<EmployeeId>),
    ApproveOrReject(Option<EmployeeId>),
    NoActions,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WaitingToSave => "Waiting to save...",
            Self::Submit(_) => "Submit",
            Self::ApproveOrReject(_) => "Approve | Reject",
            Self::NoActions => "",
        }
    }
}

/// Actions only follow an explicit backend status; a record without one gets none.
pub fn row_actions(employee: &Employee) -> RowAction {
    if employee.is_unsaved {
        return RowAction::WaitingToSave;
    }
    match employee.status {
        Some(EmployeeStatus::Draft) => RowAction::Submit(employee.id),
        Some(EmployeeStatus::PendingApproval) => RowAction::ApproveOrReject(employee.id),
        _ => RowAction::NoActions,
    }
}

pub fn id_cell(employee: &Employee) -> String {
    if employee.is_unsaved {
        return "-".to_string();
    }
    employee.id.map(|id| id.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub full_name: String,
    pub department: String,
    pub status: StatusBadge,
    pub actions: RowAction,
}

pub fn render_row(employee: &Employee) -> RowView {
    RowView {
        id: id_cell(employee),
        full_name: employee.full_name.clone(),
        department: employee.department.clone(),
        status: status_badge(employee),
        actions: row_actions(employee),
    }
}
