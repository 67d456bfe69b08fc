#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;
mod transport;

use clap::{Args, Parser, Subcommand};
use filotra::resources::{AuditAction, Decision, GroupForm, TransactionSummary};
use filotra::resources::{audit_logs, groups, transactions, users};
use filotra::{ApiClient, ApiError, ClientConfig, LoginError, LoginInput, SessionService};
use serde::Serialize;

use crate::transport::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sign-in failed: {0}")]
    Login(#[from] LoginError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Password(String),
    #[error("not signed in; pass --session-cookie or --email/--password")]
    NotSignedIn,
    #[error("unknown audit action `{0}`")]
    UnknownAction(String),
    #[error("group name must not be empty")]
    EmptyGroupName,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "filotra", about = "Filotra admin console API CLI")]
struct Cli {
    #[arg(long, env = "FILOTRA_BASE_URL", default_value = filotra::config::DEFAULT_API_BASE_URL)]
    base_url: String,

    /// Session cookie (`access_token=...` or the bare token).
    #[arg(long, env = "FILOTRA_SESSION_COOKIE")]
    session_cookie: Option<String>,

    #[arg(long, env = "FILOTRA_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "FILOTRA_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Repeat for more detail (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the role the backend reports for the current session.
    Whoami,
    /// Sign in and print the session cookie for later calls.
    Login,
    /// Sign out of the backend.
    Logout,
    Transactions(TransactionsCommand),
    Users(UsersCommand),
    Groups(GroupsCommand),
    AuditLogs {
        /// Only entries with this action (e.g. `LOGIN`, `CREATE_USER`).
        #[arg(long)]
        action: Option<String>,
    },
    /// Change the signed-in user's password.
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Args, Debug)]
struct TransactionsCommand {
    #[command(subcommand)]
    command: TransactionsSubcommand,
}

#[derive(Subcommand, Debug)]
enum TransactionsSubcommand {
    List,
    Summary,
    Approve { id: String },
    Reject { id: String },
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List {
        #[arg(long, default_value = "")]
        keyword: String,
    },
    Read { id: String },
    Delete { id: String },
}

#[derive(Args, Debug)]
struct GroupsCommand {
    #[command(subcommand)]
    command: GroupsSubcommand,
}

#[derive(Subcommand, Debug)]
enum GroupsSubcommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "type", default_value = filotra::resources::groups::DEFAULT_GROUP_TYPE)]
        kind: String,
    },
    Delete { id: String },
}

type CliSession = SessionService<ReqwestTransport>;
type CliApi = ApiClient<ReqwestTransport>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ClientConfig::default().with_base_url(&cli.base_url);
    let transport = ReqwestTransport::new(config, cli.session_cookie.as_deref())?;
    let session = SessionService::new(ApiClient::new(transport));

    match cli.command {
        Command::Login => {
            let role = sign_in(&session, cli.email.as_deref(), cli.password.as_deref()).await?;
            println!("signed in as {role}");
            if let Some(cookies) = session.api().transport().cookies() {
                println!("FILOTRA_SESSION_COOKIE='{cookies}'");
            }
            Ok(())
        }
        Command::Whoami => {
            let role = session.who_am_i().await?;
            println!("{}", role.map_or("-", filotra::Role::as_str));
            Ok(())
        }
        Command::Logout => {
            session.logout().await;
            println!("signed out");
            Ok(())
        }
        command => {
            ensure_session(&session, cli.session_cookie.is_some(), cli.email.as_deref(), cli.password.as_deref()).await?;
            run_command(&session, command).await
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();
}

async fn sign_in(session: &CliSession, email: Option<&str>, password: Option<&str>) -> Result<filotra::Role, CliError> {
    let (Some(email), Some(password)) = (email, password) else {
        return Err(CliError::NotSignedIn);
    };
    let input = LoginInput::parse(email, password).map_err(LoginError::from)?;
    Ok(session.login_with_action(&input).await?)
}

/// Sign in with credentials unless a session cookie was supplied.
async fn ensure_session(
    session: &CliSession,
    has_cookie: bool,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<(), CliError> {
    if has_cookie {
        return Ok(());
    }
    let role = sign_in(session, email, password).await?;
    tracing::info!(%role, "signed in");
    Ok(())
}

async fn run_command(session: &CliSession, command: Command) -> Result<(), CliError> {
    let api = session.api();
    match command {
        Command::Transactions(cmd) => run_transactions(api, cmd.command).await,
        Command::Users(cmd) => run_users(api, cmd.command).await,
        Command::Groups(cmd) => run_groups(api, cmd.command).await,
        Command::AuditLogs { action } => {
            let rows = match action {
                Some(raw) => {
                    let action = AuditAction::parse(&raw).ok_or(CliError::UnknownAction(raw))?;
                    audit_logs::list_by_action(api, action).await?
                }
                None => audit_logs::list(api).await?,
            };
            print_json(&rows)
        }
        Command::Password { current, new, confirm } => {
            session
                .change_password(&current, &new, &confirm)
                .await
                .map_err(|err| CliError::Password(err.message()))?;
            println!("{}", filotra::resources::profile::PASSWORD_CHANGED);
            Ok(())
        }
        Command::Whoami | Command::Login | Command::Logout => Ok(()),
    }
}

async fn run_transactions(api: &CliApi, command: TransactionsSubcommand) -> Result<(), CliError> {
    match command {
        TransactionsSubcommand::List => print_json(&transactions::list(api).await?),
        TransactionsSubcommand::Summary => {
            let rows = transactions::list(api).await?;
            print_summary(&TransactionSummary::from_transactions(&rows));
            Ok(())
        }
        TransactionsSubcommand::Approve { id } => decide(api, &id, Decision::Approved).await,
        TransactionsSubcommand::Reject { id } => decide(api, &id, Decision::Rejected).await,
    }
}

async fn decide(api: &CliApi, id: &str, decision: Decision) -> Result<(), CliError> {
    transactions::decide(api, id, decision).await?;
    println!("{id}: {decision:?}");
    Ok(())
}

async fn run_users(api: &CliApi, command: UsersSubcommand) -> Result<(), CliError> {
    match command {
        UsersSubcommand::List { keyword } => print_json(&users::list(api, &keyword).await?),
        UsersSubcommand::Read { id } => print_json(&users::get(api, &id).await?),
        UsersSubcommand::Delete { id } => {
            users::delete(api, &id).await?;
            println!("deleted user {id}");
            Ok(())
        }
    }
}

async fn run_groups(api: &CliApi, command: GroupsSubcommand) -> Result<(), CliError> {
    match command {
        GroupsSubcommand::List => print_json(&groups::list(api).await?),
        GroupsSubcommand::Create { name, description, kind } => {
            let form = GroupForm { name, description, kind };
            if !form.is_submittable() {
                return Err(CliError::EmptyGroupName);
            }
            print_json(&groups::create(api, &form).await?)
        }
        GroupsSubcommand::Delete { id } => {
            groups::delete(api, &id).await?;
            println!("deleted group {id}");
            Ok(())
        }
    }
}

fn print_summary(summary: &TransactionSummary) {
    println!("total:    {}", summary.total);
    println!("pending:  {}", summary.pending);
    println!("approved: {}", summary.approved);
    println!("rejected: {}", summary.rejected);
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
