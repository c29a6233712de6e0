//! CLI administration tool for linkgate.
//!
//! Manages accounts, API tokens and links directly against the database,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin account and a token for it
//! cargo run --bin linkgate-admin -- account create root --admin
//! cargo run --bin linkgate-admin -- token create --user root --name "Ops laptop"
//!
//! # Remove an account together with all of its links
//! cargo run --bin linkgate-admin -- account remove bob
//!
//! # Inspect and delete links
//! cargo run --bin linkgate-admin -- link list --owner alice
//! cargo run --bin linkgate-admin -- link delete promo
//!
//! # View statistics / check database
//! cargo run --bin linkgate-admin -- stats
//! cargo run --bin linkgate-admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: SQLite URL (default: `sqlite://data/linkgate.db?mode=rwc`)
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server

use linkgate::application::services::AccountService;
use linkgate::application::services::auth_service::{generate_token, hash_token};
use linkgate::config::DEFAULT_DATABASE_URL;
use linkgate::domain::entities::LinkFilter;
use linkgate::domain::repositories::{AccountRepository, LinkRepository, TokenRepository};
use linkgate::infrastructure::persistence::{
    MIGRATOR, SqliteAccountRepository, SqliteLinkRepository, SqliteTokenRepository, connect_pool,
};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::SqlitePool;
use std::sync::Arc;

/// CLI tool for managing linkgate.
#[derive(Parser)]
#[command(name = "linkgate-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect and delete links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create an account
    Create {
        username: String,

        /// Grant admin rights (see and delete every link)
        #[arg(long)]
        admin: bool,
    },

    /// List accounts
    List,

    /// Remove an account, its tokens and all links it owns
    Remove {
        username: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Account the token authenticates as
        #[arg(short, long)]
        user: String,

        /// Token name (e.g., "CI", "Mobile App")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// List links, newest first
    List {
        /// Only links owned by this account
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Permanently delete a link
    Delete {
        alias: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and apply pending migrations
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let pool = connect_pool(&database_url, 1)
        .await
        .context("Failed to connect to database")?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);

    match cli.command {
        Commands::Account { action } => handle_account_action(action, pool).await?,
        Commands::Token { action } => handle_token_action(action, pool).await?,
        Commands::Link { action } => handle_link_action(action, pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_account_action(action: AccountAction, pool: Arc<SqlitePool>) -> Result<()> {
    let service = AccountService::new(
        Arc::new(SqliteAccountRepository::new(pool.clone())),
        Arc::new(SqliteLinkRepository::new(pool)),
    );

    match action {
        AccountAction::Create { username, admin } => {
            let account = service
                .create_account(&username, admin)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create account: {}", e))?;

            println!(
                "{} {}{}",
                "✅ Account created:".green().bold(),
                account.username.cyan(),
                if account.is_admin { " (admin)" } else { "" }
            );
        }
        AccountAction::List => {
            let accounts = service
                .list_accounts()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list accounts: {}", e))?;

            println!("{}", "👤 Accounts".bright_blue().bold());
            println!();

            if accounts.is_empty() {
                println!("{}", "  No accounts found".yellow());
                return Ok(());
            }

            println!(
                "  {:<32} {:<8} {}",
                "Username".bright_white().bold(),
                "Role".bright_white().bold(),
                "Created".bright_white().bold()
            );
            println!("  {}", "─".repeat(62).bright_black());

            for account in &accounts {
                let role = if account.is_admin {
                    "admin".magenta()
                } else {
                    "user".normal()
                };
                println!(
                    "  {:<32} {:<8} {}",
                    account.username.cyan(),
                    role,
                    account
                        .created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black()
                );
            }
            println!();
        }
        AccountAction::Remove { username, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Remove account '{username}' and ALL of its links?"
                    ))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let report = service
                .remove_owner(&username)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to remove account: {}", e))?;

            println!(
                "{} {} ({} links deleted)",
                "✅ Account removed:".green().bold(),
                report.username.cyan(),
                report.deleted_links.to_string().bright_white()
            );

            if !report.failed_links.is_empty() {
                println!(
                    "{} {}",
                    "⚠️  Could not delete:".yellow(),
                    report.failed_links.join(", ")
                );
            }
        }
    }

    Ok(())
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, pool: Arc<SqlitePool>) -> Result<()> {
    let repo = SqliteTokenRepository::new(pool.clone());

    match action {
        TokenAction::Create {
            user,
            name,
            token,
            yes,
        } => {
            let accounts = SqliteAccountRepository::new(pool);
            create_token(&repo, &accounts, user, name, token, yes).await?;
        }
        TokenAction::List => list_tokens(&repo).await?,
        TokenAction::Revoke { name_or_id } => revoke_token(&repo, name_or_id).await?,
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// Only the HMAC of the token is stored; the raw value is printed once.
async fn create_token(
    repo: &SqliteTokenRepository,
    accounts: &SqliteAccountRepository,
    username: String,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let secret = std::env::var("TOKEN_SIGNING_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .context("TOKEN_SIGNING_SECRET must be set to issue tokens")?;

    accounts
        .find(&username)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Account '{username}' not found"))?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("default")
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => generate_token(),
    };

    println!("{}", "Token details:".bright_white().bold());
    println!("  Account: {}", username.cyan());
    println!("  Name:    {}", token_name.cyan());
    println!("  Token:   {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.create_token(&username, &token_name, &hash_token(&secret, &token_value))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all API tokens with status indicators.
async fn list_tokens(repo: &SqliteTokenRepository) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<20} {:<24} {:<17} {:<17} {}",
        "ID".bright_white().bold(),
        "Account".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(95).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<4} {:<20} {:<24} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.username.cyan(),
            token.name,
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Revokes a token by name or ID with confirmation prompt.
///
/// Numeric input is looked up as an ID, anything else as a name.
async fn revoke_token(repo: &SqliteTokenRepository, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token:   {}", token.name.cyan());
    println!("  Account: {}", token.username.cyan());
    println!("  ID:      {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

async fn handle_link_action(action: LinkAction, pool: Arc<SqlitePool>) -> Result<()> {
    let repo = SqliteLinkRepository::new(pool);

    match action {
        LinkAction::List { owner } => {
            let filter = owner.map_or(LinkFilter::All, LinkFilter::OwnedBy);
            let links = repo
                .list(filter)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

            println!("{}", "🔗 Links".bright_blue().bold());
            println!();

            if links.is_empty() {
                println!("{}", "  No links found".yellow());
                return Ok(());
            }

            let now = Utc::now();
            for link in &links {
                let owner = if link.owner.is_empty() {
                    "(anonymous)"
                } else {
                    link.owner.as_str()
                };
                let state = if link.is_expired_at(now) {
                    "expired".red()
                } else {
                    "active".green()
                };

                println!(
                    "  {:<32} {:<20} {:>6} clicks  {}",
                    link.alias.cyan().bold(),
                    owner,
                    link.click_count,
                    state
                );
                for target in &link.targets {
                    println!("      → {}", target.bright_black());
                }
            }

            println!();
            println!("  Total: {}", links.len().to_string().bright_white().bold());
            println!();
        }
        LinkAction::Delete { alias, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Permanently delete '{alias}'?"))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            repo.delete(&alias)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

            println!("{} {}", "✅ Link deleted:".green().bold(), alias.cyan());
        }
    }

    Ok(())
}

/// Displays system statistics.
async fn handle_stats(pool: &SqlitePool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let now = Utc::now();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let expired_count = SqliteLinkRepository::new(Arc::new(pool.clone()))
        .list(LinkFilter::All)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?
        .iter()
        .filter(|link| link.is_expired_at(now))
        .count();

    let clicks_count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0) FROM links")
        .fetch_one(pool)
        .await?;

    let accounts_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(pool)
        .await?;

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!("  Links:         {}", links_count.to_string().bright_green().bold());
    println!("  Expired:       {}", expired_count.to_string().yellow());
    println!("  Clicks:        {}", clicks_count.to_string().bright_green().bold());
    println!("  Accounts:      {}", accounts_count.to_string().bright_green().bold());
    println!("  Active tokens: {}", tokens_count.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK, schema up to date".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await?;

            println!("  SQLite:     {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
