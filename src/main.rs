mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bnpl_client::api::RequestScope;
use bnpl_client::config::Config;
use bnpl_client::AppState;
use cli::{Cli, Commands, LoanCommands, LoansCommands, PasswordCommands, PinCommands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_info = Config::from_env()?;
    let json_logs = config_info.config.json_logs;

    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    tracing::debug!(profile = config_info.profile.as_str(), "Configuration loaded");
    let mut state = AppState::new(config_info.config.clone());

    // Ctrl-C aborts whatever call is in flight instead of waiting it out.
    let scope = RequestScope::new();
    state.api = state.api.scoped(&scope);
    let interrupt = scope.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling requests");
            interrupt.cancel();
        }
    });
    let json = cli.json;

    match cli.command {
        Commands::Resolve { input } => cli::handle_resolve(&input, json),
        Commands::Validate { sale_code } => cli::handle_validate(&state, &sale_code, json).await,
        Commands::Checkout { input } => cli::handle_checkout(&state, &input, json).await,
        Commands::Order { order_id } => cli::handle_order(&state, &order_id, json).await,
        Commands::Loan(LoanCommands::Create {
            sale_id,
            installments,
        }) => cli::handle_loan_create(&state, &sale_id, installments, json).await,
        Commands::Loans(LoansCommands::List) => cli::handle_loans_list(&state, json).await,
        Commands::Dashboard => cli::handle_dashboard(&state, json).await,
        Commands::Login { token, phone } => cli::handle_login(&state, &token, phone).await,
        Commands::Logout => cli::handle_logout(&state).await,
        Commands::Pin(PinCommands::Set { pin }) => cli::handle_pin_set(&state, &pin).await,
        Commands::Pin(PinCommands::Verify { pin }) => {
            cli::handle_pin_verify(&state, &pin, json).await
        }
        Commands::Password(PasswordCommands::Check { password }) => {
            cli::handle_password_check(&password, json)
        }
        Commands::Config => cli::handle_config(&config_info),
    }
}
