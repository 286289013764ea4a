//! Administrative CLI: bootstrap tasks that run against the database
//! directly rather than through the HTTP API.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::str::FromStr;

use atelier_api::config;
use atelier_api::database::pool;
use atelier_api::database::models::UserRole;
use atelier_api::services::{TenantService, UserService};

#[derive(Parser)]
#[command(name = "atelier-admin")]
#[command(about = "Atelier admin CLI - tenant and user bootstrap")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Tenant management")]
    Tenant {
        #[command(subcommand)]
        cmd: TenantCommands,
    },

    #[command(about = "User management")]
    User {
        #[command(subcommand)]
        cmd: UserCommands,
    },
}

#[derive(Subcommand)]
enum TenantCommands {
    #[command(about = "Create a new tenant")]
    Create {
        #[arg(long, help = "Display name of the organization")]
        name: String,
        #[arg(long, help = "Login-time tenant identifier (letters, digits, - and _)")]
        slug: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    #[command(about = "Create a user within a tenant")]
    Create {
        #[arg(long, help = "Tenant slug the user belongs to")]
        tenant: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "SALES", help = "ADMIN, MANAGER or SALES")]
        role: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let pg = pool::connect(config::config()).await.context("database connection failed")?;

    match cli.command {
        Commands::Migrate => {
            pool::run_migrations(&pg).await.context("migrations failed")?;
            println!("migrations applied");
        }

        Commands::Tenant { cmd: TenantCommands::Create { name, slug } } => {
            let tenant = TenantService::new(pg.clone()).create(&name, &slug).await?;
            println!("created tenant {} ({})", tenant.slug, tenant.id);
        }

        Commands::User { cmd: UserCommands::Create { tenant, name, email, password, role } } => {
            let role = UserRole::from_str(&role)
                .map_err(|e| anyhow::anyhow!("{e}"))?;

            let tenant = TenantService::new(pg.clone())
                .find_by_slug(&tenant)
                .await?
                .map(|t| t.id);

            let Some(tenant_id) = tenant else {
                bail!("tenant not found");
            };

            let user = UserService::new(pg.clone())
                .create(tenant_id, &name, &email, &password, role)
                .await?;
            println!("created user {} ({}) with role {}", user.email, user.id, user.role);
        }
    }

    pool::close(&pg).await;
    Ok(())
}
