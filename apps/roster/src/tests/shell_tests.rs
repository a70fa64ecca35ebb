use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use client_core::{ClientResult, EmployeeStore};
use shared::{
    domain::EmployeeStatus,
    error::ApiError,
    protocol::{Employee, NewEmployee},
};

use super::*;

struct MemoryStore {
    records: Mutex<Vec<Employee>>,
    next_id: AtomicI64,
    list_fails: bool,
    /// Number of list calls that succeed before every later one fails.
    list_budget: Option<AtomicI64>,
}

impl MemoryStore {
    fn new(next_id: i64) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(next_id),
            list_fails: false,
            list_budget: None,
        }
    }

    fn unreachable() -> Self {
        Self {
            list_fails: true,
            ..Self::new(1)
        }
    }

    fn failing_after_lists(next_id: i64, successful_lists: i64) -> Self {
        Self {
            list_budget: Some(AtomicI64::new(successful_lists)),
            ..Self::new(next_id)
        }
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn list(&self) -> ClientResult<Vec<Employee>> {
        let exhausted = self
            .list_budget
            .as_ref()
            .is_some_and(|budget| budget.fetch_sub(1, Ordering::SeqCst) <= 0);
        if self.list_fails || exhausted {
            return Err(ApiError::new(503, "unavailable").into());
        }
        Ok(self.records.lock().expect("records").clone())
    }

    async fn create(&self, payload: &NewEmployee) -> ClientResult<Employee> {
        let employee = Employee {
            id: Some(EmployeeId(self.next_id.fetch_add(1, Ordering::SeqCst))),
            full_name: payload.full_name.clone(),
            department: payload.department.clone(),
            status: Some(EmployeeStatus::Draft),
            is_unsaved: false,
        };
        self.records.lock().expect("records").push(employee.clone());
        Ok(employee)
    }

    async fn get(&self, _id: EmployeeId) -> ClientResult<Employee> {
        Err(ApiError::new(404, "not found").into())
    }

    async fn update(&self, _id: EmployeeId, employee: &Employee) -> ClientResult<Employee> {
        Ok(employee.clone())
    }

    async fn delete(&self, _id: EmployeeId) -> ClientResult<()> {
        Ok(())
    }
}

async fn run_script(store: MemoryStore, script: &str) -> String {
    let mut view = RosterView::new(Arc::new(store));
    let mut shell = Shell::new(script.as_bytes(), Vec::new());
    shell.run(&mut view).await.expect("shell run");
    String::from_utf8(shell.output).expect("utf8 output")
}

#[tokio::test]
async fn creates_and_saves_a_draft() {
    let output = run_script(
        MemoryStore::new(42),
        "new\nAda Lovelace\nEngineering\nshow\nsave\nshow\nquit\n",
    )
    .await;

    assert!(output.contains("added unsaved employee -1"));
    assert!(output.contains("Save All (1)> "));
    assert!(output.contains("Waiting to save..."));
    assert!(output.contains("saved -1 as 42"));
    assert!(output.contains("[ok] Employees saved successfully!"));
    assert!(output.contains("Submit"));
    assert!(!output.contains("discarding"));
}

#[tokio::test]
async fn dialog_reprompts_until_form_is_valid() {
    let output = run_script(
        MemoryStore::new(1),
        "new\n   \nEngineering\nAda\nEngineering\n",
    )
    .await;

    assert!(output.contains("full name is required, try again"));
    assert!(output.contains("added unsaved employee -1"));
    assert!(output.contains("discarding 1 unsaved employee(s)"));
}

#[tokio::test]
async fn cancel_leaves_table_empty() {
    let output = run_script(MemoryStore::new(1), "new\n:cancel\nshow\nsave\n").await;

    assert!(output.contains("cancelled"));
    assert!(output.contains("(no rows)"));
    assert!(output.contains("nothing to save"));
    assert!(output.contains("Save (0)> "));
}

#[tokio::test]
async fn select_narrows_the_save_label() {
    let output = run_script(
        MemoryStore::new(1),
        "new\nAda\nEng\nnew\nAlan\nResearch\nselect -2\nselect x\n",
    )
    .await;

    assert!(output.contains("1 row(s) selected"));
    assert!(output.contains("Save Selected (1)> "));
    assert!(output.contains("invalid id"));
}

#[tokio::test]
async fn failed_initial_load_is_reported() {
    let output = run_script(MemoryStore::unreachable(), "bogus\n").await;

    assert!(output.contains("[error] Failed to load employees"));
    assert!(output.contains("unknown command `bogus`"));
}

#[tokio::test]
async fn failed_refresh_after_save_is_reported() {
    let output = run_script(
        MemoryStore::failing_after_lists(7, 1),
        "new\nAda\nEng\nsave\nquit\n",
    )
    .await;

    assert!(output.contains("saved -1 as 7"));
    assert!(output.contains("[ok] Employees saved successfully!"));
    assert!(output
        .contains("table not refreshed: failed to load employees: backend rejected request:"));
    assert!(output.contains("(503): unavailable"));
}
