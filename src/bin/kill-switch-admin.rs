//! Kill Switch admin CLI - manage stores from the terminal

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kill_switch::admin::{AdminClient, CreateForm, Dashboard};
use kill_switch::registry::{SiteKey, Store};

#[derive(Parser)]
#[command(name = "kill-switch-admin", version, about = "Control storefront kill switches")]
struct Cli {
    /// Base address of the registry service
    #[arg(
        long,
        env = "KILL_SWITCH_URL",
        default_value = "http://localhost:5000",
        global = true
    )]
    server: String,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all stores
    List,
    /// Onboard a new client store
    Create {
        #[arg(long)]
        client: String,
        #[arg(long)]
        store: String,
        /// Message shown to shoppers while the store is OFF
        #[arg(long)]
        message: Option<String>,
    },
    /// Flip a store to the opposite of its current status
    Toggle { key: String },
    /// Delete a store
    Delete {
        key: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the installable snippet for a store
    Snippet { key: String },
    /// Query the public status check for a key
    Status { key: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = AdminClient::new(&cli.server);

    match cli.command {
        // The public check needs no store list
        Command::Status { key } => {
            let check = client.check_status(&parse_key(&key)?).await?;
            println!("{}", serde_json::to_string_pretty(&check)?);
            Ok(())
        }
        command => {
            let dashboard = Dashboard::load(client)
                .await
                .with_context(|| format!("failed to load stores from {}", cli.server))?;
            run_dashboard(dashboard, command).await
        }
    }
}

async fn run_dashboard(mut dashboard: Dashboard, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List | Command::Status { .. } => {}
        Command::Create {
            client,
            store,
            message,
        } => {
            let mut form = CreateForm::new(client, store);
            if let Some(message) = message {
                form = form.with_message(message);
            }
            let created = dashboard.create(&mut form).await?;
            println!("Created {} with site key {}", created.store_name, created.site_key);
        }
        Command::Toggle { key } => {
            let updated = dashboard.toggle(&parse_key(&key)?).await?;
            println!("{} is now {}", updated.store_name, updated.status);
        }
        Command::Delete { key, yes } => {
            let deleted = dashboard
                .delete(&parse_key(&key)?, |store| yes || confirm_delete(store))
                .await?;
            if !deleted {
                println!("Delete cancelled");
            }
        }
        Command::Snippet { key } => {
            println!("{}", dashboard.snippet(&parse_key(&key)?)?);
            return Ok(());
        }
    }

    println!("{}", dashboard.render());
    Ok(())
}

fn parse_key(raw: &str) -> anyhow::Result<SiteKey> {
    SiteKey::parse(raw).ok_or_else(|| anyhow!("invalid site key '{}'", raw))
}

fn confirm_delete(store: &Store) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Delete {} / {} ({})?",
            store.client_name, store.store_name, store.site_key
        ))
        .default(false)
        .interact()
        .unwrap_or(false)
}
