//! Subcommands and the shared state they run against.

mod employees;
mod items;
mod orders;
mod people;
mod profile;

use std::sync::Arc;

use clap::Subcommand;
use resources::domain::{
    DetailPresenter, Draft, ListController, Notifier, PrepareFrom, load_dashboard,
};
use resources::{ResourceGateway, SessionContext};
use resources_sdk::{Resource, ResourceId};

use crate::output::Output;

pub use employees::EmployeesCommand;
pub use items::{CategoriesCommand, ItemsCommand};
pub use orders::{CustomOrdersCommand, OrdersCommand};
pub use people::{ClientsCommand, TicketsCommand};
pub use profile::ProfileArgs;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with --email/--password and show the session user
    Login {
        /// Also print the bearer token, for use as DEPOT_TOKEN
        #[arg(long)]
        print_token: bool,
    },
    /// Validate configuration and exit
    Check,
    /// Staff accounts
    #[command(subcommand)]
    Employees(EmployeesCommand),
    /// Registered customers
    #[command(subcommand)]
    Clients(ClientsCommand),
    /// Catalog items
    #[command(subcommand)]
    Items(ItemsCommand),
    /// Catalog categories
    #[command(subcommand)]
    Categories(CategoriesCommand),
    /// Bespoke orders
    #[command(subcommand)]
    CustomOrders(CustomOrdersCommand),
    /// Standard orders
    #[command(subcommand)]
    Orders(OrdersCommand),
    /// Support tickets
    #[command(subcommand)]
    Tickets(TicketsCommand),
    /// Order, staff and catalog statistics
    Dashboard,
    /// Show or edit an employee profile
    Profile(ProfileArgs),
}

/// Everything a command needs: the gateway, the session it authenticates
/// with, the notice sink and the output renderer.
pub struct Context {
    pub gateway: Arc<dyn ResourceGateway>,
    pub session: Arc<SessionContext>,
    pub notifier: Arc<dyn Notifier>,
    pub output: Output,
}

impl Context {
    /// Run a resource command. `login` and `check` are handled by `main`.
    ///
    /// # Errors
    /// Any failure of the command; controller failures have already been
    /// shown as notices.
    pub async fn dispatch(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Login { .. } | Commands::Check => Ok(()),
            Commands::Employees(cmd) => cmd.run(self).await,
            Commands::Clients(cmd) => cmd.run(self).await,
            Commands::Items(cmd) => cmd.run(self).await,
            Commands::Categories(cmd) => cmd.run(self).await,
            Commands::CustomOrders(cmd) => cmd.run(self).await,
            Commands::Orders(cmd) => cmd.run(self).await,
            Commands::Tickets(cmd) => cmd.run(self).await,
            Commands::Dashboard => {
                let stats = load_dashboard(self.gateway.as_ref()).await?;
                self.output.dashboard(&stats)
            }
            Commands::Profile(args) => args.run(self).await,
        }
    }

    fn controller<R: Resource>(&self) -> Arc<ListController<R>> {
        Arc::new(ListController::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.notifier),
        ))
    }

    async fn loaded<R: Resource>(
        &self,
        search: Option<&str>,
    ) -> anyhow::Result<Arc<ListController<R>>> {
        let controller = self.controller::<R>();
        controller.load().await?;
        if let Some(text) = search {
            controller.search(text);
        }
        Ok(controller)
    }

    /// Load the collection and print the (filtered) view.
    async fn list<R: Resource>(
        &self,
        search: Option<&str>,
        columns: &[&str],
    ) -> anyhow::Result<()> {
        let controller = self.loaded::<R>(search).await?;
        self.output.list(&controller.view(), columns)
    }

    /// Read one item straight from the server.
    async fn show<R: Resource>(&self, id: i64) -> anyhow::Result<()> {
        let item = self
            .controller::<R>()
            .refresh_one(&ResourceId::Numeric(id))
            .await?;
        self.output.item(&item)
    }

    /// Load the collection and open a detail view on `id`.
    async fn open<R, D>(&self, id: i64) -> anyhow::Result<DetailPresenter<R, D>>
    where
        R: Resource,
        D: Default + PrepareFrom<R>,
    {
        let controller = self.loaded::<R>(None).await?;
        let mut presenter = DetailPresenter::new(controller);
        presenter.open(&ResourceId::Numeric(id))?;
        Ok(presenter)
    }

    async fn commit<R, D>(&self, presenter: &mut DetailPresenter<R, D>) -> anyhow::Result<()>
    where
        R: Resource,
        D: Draft<R>,
    {
        let item = presenter.commit().await?;
        self.output.item(&item)
    }

    async fn delete<R: Resource>(&self, id: i64) -> anyhow::Result<()> {
        let mut presenter: DetailPresenter<R> = self.open(id).await?;
        presenter.delete().await?;
        Ok(())
    }
}
