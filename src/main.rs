use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use marquee::config::{ClientConfig, ConfigError};
use marquee::net::api::ApiClient;
use marquee::net::error::ApiError;
use marquee::pages::{self, PageError};
use marquee::routes::{Page, Redirect};
use marquee::state::auth::SessionStore;
use marquee::state::storage::{FileStorage, MemoryStorage, SessionStorage};
use marquee::util::forms::{ForgotPasswordForm, LoginForm, ProfileForm, RegisterForm, ResetPasswordForm};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("not logged in; run `marquee login` first")]
    NotLoggedIn,
    #[error("refusing to delete the account without --yes")]
    Unconfirmed,
}

#[derive(Parser, Debug)]
#[command(name = "marquee", about = "Movie ticketing account client")]
struct Cli {
    /// Backend base URL (overrides MARQUEE_API_BASE_URL).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding the persisted session (overrides MARQUEE_STATE_DIR).
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Keep the session in memory only for this invocation.
    #[arg(long, global = true, default_value_t = false)]
    ephemeral: bool,

    /// Log pipeline activity to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account.
    Register(RegisterArgs),
    /// Sign in and save the session.
    Login(LoginArgs),
    /// Request a password-reset OTP by email.
    ForgotPassword(ForgotPasswordArgs),
    /// Set a new password with the emailed OTP.
    ResetPassword(ResetPasswordArgs),
    /// Show the signed-in profile.
    #[command(alias = "me")]
    Dashboard,
    /// Change profile fields; omitted fields stay as they are.
    UpdateProfile(UpdateProfileArgs),
    /// Permanently delete the signed-in account.
    DeleteAccount(DeleteAccountArgs),
    /// Clear the saved session.
    Logout,
    /// Print whether a session is saved.
    Status,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    mobile_number: String,
    #[arg(long, env = "MARQUEE_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, env = "MARQUEE_CONFIRM_PASSWORD", hide_env_values = true)]
    confirm_password: String,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "MARQUEE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct ForgotPasswordArgs {
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct ResetPasswordArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    otp: String,
    #[arg(long, env = "MARQUEE_NEW_PASSWORD", hide_env_values = true)]
    new_password: String,
    #[arg(long, env = "MARQUEE_CONFIRM_PASSWORD", hide_env_values = true)]
    confirm_password: String,
}

#[derive(Args, Debug)]
struct UpdateProfileArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    mobile_number: Option<String>,
}

#[derive(Args, Debug)]
struct DeleteAccountArgs {
    /// Confirm the deletion.
    #[arg(long, default_value_t = false)]
    yes: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN })
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_api_base_url(base_url)?;
    }
    if let Some(dir) = cli.state_dir {
        config = config.with_state_dir(dir);
    }

    let storage: Arc<dyn SessionStorage> = if cli.ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(FileStorage::new(&config.state_dir))
    };
    let session = SessionStore::hydrate(storage);
    let api = ApiClient::new(&config, session.clone())?;
    tracing::debug!(base_url = api.base_url(), state_dir = %config.state_dir.display(), "client ready");

    match cli.command {
        Command::Register(args) => {
            let form = RegisterForm {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email,
                mobile_number: args.mobile_number,
                password: args.password,
                confirm_password: args.confirm_password,
            };
            let (created, redirect) = pages::register::submit(&api, &form).await?;
            println!("created account for {}", created.email);
            print_redirect(&redirect);
        }
        Command::Login(args) => {
            let form = LoginForm { email: args.email, password: args.password };
            let (user, redirect) = pages::login::submit(&api, &form).await?;
            println!("signed in as {} <{}>", user.full_name(), user.email);
            print_redirect(&redirect);
        }
        Command::ForgotPassword(args) => {
            let redirect = pages::forgot_password::submit(&api, &ForgotPasswordForm { email: args.email }).await?;
            print_redirect(&redirect);
        }
        Command::ResetPassword(args) => {
            let form = ResetPasswordForm {
                email: args.email,
                otp: args.otp,
                new_password: args.new_password,
                confirm_password: args.confirm_password,
            };
            let redirect = pages::reset_password::submit(&api, &form).await?;
            print_redirect(&redirect);
        }
        Command::Dashboard => match pages::dashboard::load(&api).await {
            pages::dashboard::DashboardOutcome::Show(view) => print!("{}", view.render()),
            pages::dashboard::DashboardOutcome::Redirect(redirect) => {
                if let Some(notice) = redirect.notice {
                    eprintln!("{notice}");
                }
                return Err(CliError::NotLoggedIn);
            }
        },
        Command::UpdateProfile(args) => {
            let form = ProfileForm {
                first_name: args.first_name.unwrap_or_default(),
                last_name: args.last_name.unwrap_or_default(),
                mobile_number: args.mobile_number.unwrap_or_default(),
            };
            let view = pages::dashboard::update_profile(&api, &form).await?;
            print!("{}", view.render());
        }
        Command::DeleteAccount(args) => {
            if !args.yes {
                return Err(CliError::Unconfirmed);
            }
            let redirect = pages::dashboard::delete_account(&api).await?;
            print_redirect(&redirect);
        }
        Command::Logout => {
            let redirect = pages::dashboard::logout(&session);
            println!("signed out");
            print_redirect(&redirect);
        }
        Command::Status => {
            let snapshot = session.snapshot();
            match snapshot.user() {
                Some(user) => println!("authenticated as {} ({})", user.email, user.role),
                None => println!("not authenticated"),
            }
        }
    }
    Ok(())
}

fn print_redirect(redirect: &Redirect) {
    if let Some(notice) = redirect.notice {
        println!("{notice}");
    }
    match redirect.to {
        Page::Dashboard => println!("next: marquee dashboard"),
        Page::Login => println!("next: marquee login --email <email>"),
        Page::ResetPassword => {
            let email = redirect.email.as_deref().unwrap_or("<email>");
            println!("next: marquee reset-password --email {email} --otp <otp>");
        }
        Page::Register | Page::ForgotPassword => println!("next: {}", redirect.to),
    }
}
