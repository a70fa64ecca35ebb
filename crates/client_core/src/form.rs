//! Creation dialog model: the form a user fills in before a draft is added.

use shared::protocol::NewEmployee;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("full name is required")]
    MissingFullName,
    #[error("department is required")]
    MissingDepartment,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub full_name: String,
    pub department: String,
}

impl EmployeeForm {
    pub fn new(full_name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            department: department.into(),
        }
    }

    /// Both fields are required; surrounding whitespace is dropped.
    pub fn validate(&self) -> Result<NewEmployee, FormError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(FormError::MissingFullName);
        }
        let department = self.department.trim();
        if department.is_empty() {
            return Err(FormError::MissingDepartment);
        }
        Ok(NewEmployee {
            full_name: full_name.to_string(),
            department: department.to_string(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Source of new employee entries.
///
/// `Ok(None)` means the user cancelled. Implementations keep prompting while the
/// entered form is invalid and only return a form once it validates.
pub trait CreationDialog {
    fn open(&mut self) -> anyhow::Result<Option<EmployeeForm>>;
}
