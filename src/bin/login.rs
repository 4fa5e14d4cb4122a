use std::process::ExitCode;

use clap::Parser;
use restaurant_auth::client::{AuthFlow, FlowState, GoTrueClient, LoginForm};
use restaurant_auth::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "login", about = "Sign up or sign in, then provision the application user")]
struct Cli {
    /// Server hosting `/api/ensure-user`.
    #[arg(long, env = "APP_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Identity provider project URL.
    #[arg(long, env = "AUTH_URL")]
    auth_url: String,

    /// Public (anon) API key for the identity provider.
    #[arg(long, env = "AUTH_ANON_KEY", hide_env_values = true)]
    anon_key: String,

    #[arg(long)]
    email: String,

    #[arg(long, env = "LOGIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// `signup` or `signin`.
    #[arg(long, default_value = "signup")]
    mode: String,

    /// `customer` or `staff`.
    #[arg(long, default_value = "customer")]
    role: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing("warn");
    let cli = Cli::parse();

    let form = LoginForm { email: cli.email, password: cli.password, mode: cli.mode, role: cli.role };
    let creds = match form.validate() {
        Ok(c) => c,
        Err(errors) => {
            for err in errors.errors() {
                eprintln!("{}: {}", err.field.as_deref().unwrap_or("form"), err.message);
            }
            return ExitCode::from(2);
        }
    };

    let provider = match GoTrueClient::new(&cli.auth_url, cli.anon_key) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let mut flow = match AuthFlow::new(provider, &cli.base_url) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match flow.submit(&creds).await {
        FlowState::Done { redirect_to } => {
            println!("Signed in. Continue at {redirect_to}");
            ExitCode::SUCCESS
        }
        FlowState::Failed { message } => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
        other => {
            eprintln!("login stopped in unexpected state: {other:?}");
            ExitCode::FAILURE
        }
    }
}
