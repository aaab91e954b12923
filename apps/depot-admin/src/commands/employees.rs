use clap::Subcommand;
use resources::domain::{ApprovalDraft, DetailPresenter};
use resources_sdk::Employee;

use super::Context;

const COLUMNS: &[&str] = &["id", "name", "email", "role", "country", "status"];

#[derive(Subcommand)]
pub enum EmployeesCommand {
    /// List employees, optionally filtered by id, name, country or status
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one employee
    Show { id: i64 },
    /// Approve a pending employee with a salary and role
    Approve {
        id: i64,
        #[arg(long)]
        salary: String,
        /// Defaults to the current role, or `Employee`
        #[arg(long)]
        role: Option<String>,
    },
    /// Delete an employee
    Delete { id: i64 },
}

impl EmployeesCommand {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        match self {
            Self::List { search } => ctx.list::<Employee>(search.as_deref(), COLUMNS).await,
            Self::Show { id } => ctx.show::<Employee>(id).await,
            Self::Approve { id, salary, role } => {
                let mut presenter: DetailPresenter<Employee, ApprovalDraft> = ctx.open(id).await?;
                let draft = presenter.draft_mut();
                draft.salary = salary;
                if let Some(role) = role {
                    draft.role = role;
                }
                ctx.commit(&mut presenter).await
            }
            Self::Delete { id } => ctx.delete::<Employee>(id).await,
        }
    }
}
