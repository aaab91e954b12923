use clap::Subcommand;
use resources::domain::{DetailPresenter, ReplyDraft};
use resources_sdk::{Client, Ticket};

use super::Context;

const CLIENT_COLUMNS: &[&str] = &["id", "name", "email", "country", "city"];
const TICKET_COLUMNS: &[&str] = &["id", "name", "email", "subject", "status"];

#[derive(Subcommand)]
pub enum ClientsCommand {
    /// List clients, optionally filtered by id, name, email or country
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one client
    Show { id: i64 },
}

impl ClientsCommand {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        match self {
            Self::List { search } => ctx.list::<Client>(search.as_deref(), CLIENT_COLUMNS).await,
            Self::Show { id } => ctx.show::<Client>(id).await,
        }
    }
}

#[derive(Subcommand)]
pub enum TicketsCommand {
    /// List support tickets, optionally filtered
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one ticket with its reply
    Show { id: i64 },
    /// Answer a pending ticket, which closes it
    Reply { id: i64, text: String },
}

impl TicketsCommand {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        match self {
            Self::List { search } => ctx.list::<Ticket>(search.as_deref(), TICKET_COLUMNS).await,
            Self::Show { id } => ctx.show::<Ticket>(id).await,
            Self::Reply { id, text } => {
                let mut presenter: DetailPresenter<Ticket, ReplyDraft> = ctx.open(id).await?;
                presenter.draft_mut().reply = text;
                ctx.commit(&mut presenter).await
            }
        }
    }
}
