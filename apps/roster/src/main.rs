use std::{io, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{ClientResult, EmployeeClient, EmployeeForm, EmployeeStore, RosterView};
use shared::{
    domain::{EmployeeId, EmployeeStatus},
    protocol::Employee,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod shell;
mod table;

use config::{load_settings, DEFAULT_SETTINGS_FILE};

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Manage the employee roster")]
struct Args {
    /// Employee collection URL, e.g. http://localhost:8080/api/employees
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every employee
    List,
    /// Print one employee as JSON
    Get { id: i64 },
    /// Create an employee directly, without a draft
    Create {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        department: String,
    },
    /// Replace an employee record
    Update {
        id: i64,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete an employee
    Delete { id: i64 },
    /// Interactive session with local drafts and batch save
    Shell,
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Adds the employee id to a single-record failure; a 404 means the id is unknown.
fn for_employee<T>(result: ClientResult<T>, action: &str, id: i64) -> Result<T> {
    match result {
        Err(err) if err.status() == Some(404) => bail!("employee {id} does not exist"),
        other => other.with_context(|| format!("failed to {action} employee {id}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let client = EmployeeClient::new(&settings.base_url)
        .with_context(|| format!("invalid employee backend url '{}'", settings.base_url))?;
    info!(base_url = client.base_url(), "using employee backend");

    match args.command {
        Command::List => {
            let employees = client.list().await.context("failed to list employees")?;
            print!("{}", table::render_table(&employees, &[]));
        }
        Command::Get { id } => {
            let employee = for_employee(client.get(EmployeeId(id)).await, "fetch", id)?;
            print_json(&employee)?;
        }
        Command::Create {
            full_name,
            department,
        } => {
            let payload = EmployeeForm::new(full_name, department).validate()?;
            let created = client
                .create(&payload)
                .await
                .context("failed to create employee")?;
            print_json(&created)?;
        }
        Command::Update {
            id,
            full_name,
            department,
            status,
        } => {
            let form = EmployeeForm::new(full_name, department).validate()?;
            let employee = Employee {
                id: Some(EmployeeId(id)),
                full_name: form.full_name,
                department: form.department,
                status: status.map(EmployeeStatus::from),
                is_unsaved: false,
            };
            let updated = for_employee(
                client.update(EmployeeId(id), &employee).await,
                "update",
                id,
            )?;
            print_json(&updated)?;
        }
        Command::Delete { id } => {
            for_employee(client.delete(EmployeeId(id)).await, "delete", id)?;
            println!("deleted employee {id}");
        }
        Command::Shell => {
            let mut view = RosterView::new(Arc::new(client));
            let stdin = io::stdin();
            let mut session = shell::Shell::new(stdin.lock(), io::stdout());
            session.run(&mut view).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
