use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;

use bnpl_client::config::ConfigInfo;
use bnpl_client::deeplink::{resolve_deep_link, resolve_sale_code};
use bnpl_client::services::{
    installment_options, CheckoutFlow, CheckoutStep, LoanService, OrderService, SaleValidator,
    SecurityGate, UnlockOutcome,
};
use bnpl_client::storage::LastLogin;
use bnpl_client::utils::{format_amount, format_currency};
use bnpl_client::validation::{password_strength, validate_password};
use bnpl_client::AppState;

#[derive(Parser)]
#[command(name = "bnpl-client")]
#[command(about = "BNPL mobile client - checkout, loans and account tools", long_about = None)]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a scanned QR payload or deep link into a sale code
    Resolve {
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// Check whether a sale can be paid with BNPL
    Validate {
        #[arg(value_name = "SALE_CODE")]
        sale_code: String,
    },

    /// Run the scan → validate flow for a QR payload
    Checkout {
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// Show order details and the available installment plans
    Order {
        #[arg(value_name = "ORDER_ID")]
        order_id: String,
    },

    /// Loan commands
    #[command(subcommand)]
    Loan(LoanCommands),

    /// Loan listing commands
    #[command(subcommand)]
    Loans(LoansCommands),

    /// Promotions, credit limit and loans in one view
    Dashboard,

    /// Store a bearer token for subsequent calls
    Login {
        #[arg(long, env = "BNPL_TOKEN")]
        token: String,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Clear the stored session
    Logout,

    /// PIN management
    #[command(subcommand)]
    Pin(PinCommands),

    /// Password helpers
    #[command(subcommand)]
    Password(PasswordCommands),

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum LoanCommands {
    /// Create a loan for a validated sale
    Create {
        #[arg(value_name = "SALE_ID")]
        sale_id: String,

        /// Number of installments (1 pays at once)
        #[arg(long, default_value_t = 1)]
        installments: u32,
    },
}

#[derive(Subcommand)]
pub enum LoansCommands {
    /// List loans with paid and remaining amounts
    List,
}

#[derive(Subcommand)]
pub enum PinCommands {
    /// Set a new 4-digit PIN
    Set {
        #[arg(value_name = "PIN")]
        pin: String,
    },
    /// Check a PIN against the stored one
    Verify {
        #[arg(value_name = "PIN")]
        pin: String,
    },
}

#[derive(Subcommand)]
pub enum PasswordCommands {
    /// Report password rule violations and strength
    Check {
        #[arg(value_name = "PASSWORD")]
        password: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn handle_resolve(input: &str, json: bool) -> anyhow::Result<()> {
    let resolution = resolve_sale_code(input);
    if json {
        return print_json(&resolution);
    }

    if !resolution.is_valid {
        anyhow::bail!("Invalid sale code");
    }
    if let Some(order_id) = &resolution.order_id {
        println!("Sale code: {}", order_id);
    }
    if let Some(merchant_id) = &resolution.merchant_id {
        println!("Merchant: {}", merchant_id);
    }
    println!("Source: {:?}", resolution.source);
    if let Some(target) = resolve_deep_link(input) {
        println!("Deep link: {:?}", target);
    }
    Ok(())
}

pub async fn handle_validate(state: &AppState, sale_code: &str, json: bool) -> anyhow::Result<()> {
    let validation = SaleValidator::new(state.api.clone()).validate_sale(sale_code).await;
    if json {
        return print_json(&validation);
    }
    if validation.success {
        println!("✓ {}", validation.message);
        Ok(())
    } else {
        anyhow::bail!("{}", validation.message)
    }
}

pub async fn handle_checkout(state: &AppState, input: &str, json: bool) -> anyhow::Result<()> {
    let checkout = CheckoutFlow::new(state.api.clone())
        .checkout(input)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if json {
        return print_json(&checkout);
    }
    match checkout.step {
        CheckoutStep::Order {
            sale_code,
            merchant_id,
        } => {
            println!("✓ Sale {} is payable", sale_code);
            if let Some(merchant_id) = merchant_id {
                println!("  Merchant: {}", merchant_id);
            }
            if let Some(order) = &checkout.order {
                let currency = order.currency.as_deref().unwrap_or("EGP");
                println!("  Total: {}", format_currency(&order.total_amount, currency));
            }
            println!("  Next: bnpl-client loan create {} --installments N", sale_code);
            Ok(())
        }
        CheckoutStep::Merchant { merchant_id } => {
            println!("Merchant QR for {}", merchant_id);
            Ok(())
        }
        CheckoutStep::Blocked { message, .. } => anyhow::bail!("{}", message),
        CheckoutStep::Invalid => anyhow::bail!("Invalid sale code"),
    }
}

pub async fn handle_order(state: &AppState, order_id: &str, json: bool) -> anyhow::Result<()> {
    let details = OrderService::new(state.api.clone())
        .fetch_order_details(order_id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if json {
        return print_json(&details);
    }

    let currency = details.currency.as_deref().unwrap_or("EGP");
    println!("Order {}", details.sale_id);
    if let Some(merchant) = &details.merchant_name {
        println!("  Merchant: {}", merchant);
    }
    for item in &details.items {
        println!("  {} x{}  {}", item.name, item.quantity, format_amount(&item.price));
    }
    println!("  Total: {}", format_currency(&details.total_amount, currency));
    println!("\nPlans:");
    for plan in installment_options(&details) {
        if plan.is_pay_at_once {
            println!("  Pay in full: {}", format_currency(&plan.installment_amount, currency));
        } else {
            println!(
                "  {} installments of {}",
                plan.installment_count,
                format_currency(&plan.installment_amount, currency)
            );
        }
    }
    Ok(())
}

pub async fn handle_loan_create(
    state: &AppState,
    sale_id: &str,
    installments: u32,
    json: bool,
) -> anyhow::Result<()> {
    let result = OrderService::new(state.api.clone())
        .create_loan(sale_id, installments)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if json {
        return print_json(&result);
    }
    match &result.loan_id {
        Some(loan_id) => println!("✓ Loan {} created", loan_id),
        None => println!("✓ Loan created"),
    }
    if let Some(message) = &result.message {
        println!("  {}", message);
    }
    Ok(())
}

pub async fn handle_loans_list(state: &AppState, json: bool) -> anyhow::Result<()> {
    let loans = LoanService::new(state.api.clone())
        .list_loans()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if json {
        return print_json(&loans);
    }
    if loans.is_empty() {
        println!("No loans");
        return Ok(());
    }

    for overview in &loans {
        let loan = &overview.loan;
        println!(
            "{} | {} | {:?} | total {} | paid {} | remaining {}",
            loan.id,
            loan.merchant_name.as_deref().unwrap_or("-"),
            loan.status,
            format_amount(&loan.total_amount),
            format_amount(&overview.paid_amount),
            format_amount(&overview.remaining_amount),
        );
        if !overview.details_loaded {
            println!("  (details unavailable)");
        }
    }
    Ok(())
}

pub async fn handle_dashboard(state: &AppState, json: bool) -> anyhow::Result<()> {
    let dashboard = state.dashboard().load().await;
    if json {
        return print_json(&dashboard);
    }

    match &dashboard.credit_limit {
        Some(limit) => {
            let currency = limit.currency.as_deref().unwrap_or("EGP");
            println!(
                "Available credit: {} of {}",
                format_currency(&limit.available_limit, currency),
                format_currency(&limit.total_limit, currency)
            );
        }
        None => println!("Available credit: -"),
    }
    println!("Promotions: {}", dashboard.promotions.len());
    for promotion in &dashboard.promotions {
        println!("  - {}", promotion.title);
    }
    println!("Active loans: {}", dashboard.loans.len());
    for error in &dashboard.errors {
        println!("⚠️  {}", error);
    }
    Ok(())
}

pub async fn handle_login(state: &AppState, token: &str, phone: Option<String>) -> anyhow::Result<()> {
    if token.trim().is_empty() {
        anyhow::bail!("Token must not be empty");
    }
    state.session.set_token(token.trim()).await?;
    state.session.set_failed_attempts(0).await?;
    if let Some(phone_number) = phone {
        state
            .session
            .set_last_login(&LastLogin {
                phone_number,
                display_name: None,
                logged_in_at: Utc::now(),
            })
            .await?;
    }
    tracing::info!("Session token stored");
    println!("✓ Logged in");
    Ok(())
}

pub async fn handle_logout(state: &AppState) -> anyhow::Result<()> {
    state.session.end_session().await?;
    println!("✓ Logged out");
    Ok(())
}

pub async fn handle_pin_set(state: &AppState, pin: &str) -> anyhow::Result<()> {
    SecurityGate::new(state.session.clone())
        .set_pin(pin)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    println!("✓ PIN updated");
    Ok(())
}

pub async fn handle_pin_verify(state: &AppState, pin: &str, json: bool) -> anyhow::Result<()> {
    let outcome = SecurityGate::new(state.session.clone()).verify_pin(pin).await?;
    if json {
        return print_json(&outcome);
    }
    match outcome {
        UnlockOutcome::Unlocked => {
            println!("✓ Unlocked");
            Ok(())
        }
        UnlockOutcome::Rejected { attempts_left } => {
            anyhow::bail!("Wrong PIN, {} attempts left", attempts_left)
        }
        UnlockOutcome::LockedOut => anyhow::bail!("Too many attempts. Please log in again."),
        UnlockOutcome::NotConfigured => anyhow::bail!("No PIN has been set"),
    }
}

pub fn handle_password_check(password: &str, json: bool) -> anyhow::Result<()> {
    let check = validate_password(password);
    let strength = password_strength(password);
    if json {
        return print_json(&serde_json::json!({
            "isValid": check.is_valid,
            "errors": check.errors,
            "strength": strength,
        }));
    }
    println!("Strength: {:?}", strength);
    if check.is_valid {
        println!("✓ Password meets all requirements");
        return Ok(());
    }
    for error in &check.errors {
        println!("  - {}", error);
    }
    anyhow::bail!("Password does not meet requirements")
}

pub fn handle_config(info: &ConfigInfo) -> anyhow::Result<()> {
    let config = &info.config;
    println!("Configuration ({}):", info.profile.as_str());
    println!("  Identity URL: {}", config.identity_url);
    println!("  App URL: {}", config.app_url);
    println!(
        "  API key: {}",
        if config.api_key.is_some() { "****" } else { "(none)" }
    );
    println!("  Request timeout: {}s", config.request_timeout_secs);
    println!("  Image concurrency: {}", config.image_concurrency);
    println!("  Breaker threshold: {}", config.breaker_failure_threshold);
    match &config.session_file {
        Some(path) => println!("  Session file: {}", path.display()),
        None => println!("  Session file: (in memory)"),
    }
    if !info.overrides.is_empty() {
        println!("  Overridden: {}", info.overrides.join(", "));
    }
    println!("✓ Configuration is valid");
    Ok(())
}
