//! Command-line front end for a silex session.
//!
//! The session is kept in a file between invocations, so `login`, `whoami`
//! and `logout` can be run one after the other.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use pico_args::Arguments;
use silex::prelude::*;

const HELP: &str = "\
Manage a silex session

USAGE:
  silex-session [OPTIONS] <COMMAND>

COMMANDS:
  login <IDENTIFIER>       Authenticate and store the session token
  whoami                   Show the stored session
  logout                   Revoke the token and forget the session

OPTIONS:
  --base-path  URL         REST API root        [default: env SILEX_BASE_PATH or https://localhost]
  --store      PATH        Session file         [default: env SILEX_STORE_PATH or .silex-session.json]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SILEX_BASE_PATH, SILEX_COOKIE_NAME, SILEX_COOKIE_DOMAIN, SILEX_STORE_PATH
  SILEX_PASSWORD           Password for login; read from stdin when unset
  RUST_LOG                 Log filter (e.g. silex_session=debug)
";

const DEFAULT_STORE_PATH: &str = ".silex-session.json";

enum Command {
    Login { identifier: String, password: String },
    Whoami,
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    silex::logging::init();

    let mut config = ClientConfig::from_env()?;
    if let Some(base_path) = pargs.opt_value_from_str::<_, String>("--base-path")? {
        config.base_path = base_path;
        config.validate()?;
    }
    let store_path = pargs
        .opt_value_from_str::<_, PathBuf>("--store")?
        .or_else(|| config.store_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
    let command = match pargs.subcommand()?.as_deref() {
        Some("login") => Command::Login {
            identifier: pargs.free_from_str()?,
            password: read_password(
                std::env::var("SILEX_PASSWORD").ok(),
                io::stdin().lock(),
            )?,
        },
        Some("whoami") => Command::Whoami,
        Some("logout") => Command::Logout,
        _ => {
            eprint!("{HELP}");
            std::process::exit(2);
        }
    };

    let store = FileStore::new(store_path.clone())?;
    let client = SessionClient::new(ReqwestClient::new(), store, &config);
    tracing::debug!(store = %store_path.display(), base_path = %config.base_path, "client ready");

    match command {
        Command::Login {
            identifier,
            password,
        } => {
            let user = client.login(&identifier, &password).await?;
            println!("logged in as {} <{}>", user.full_name(), user.email());
            print_expiry(&user);
        }
        Command::Whoami => {
            let user = client.restore();
            if !user.is_logged_in() {
                println!("not logged in");
                return Ok(());
            }
            println!("{} <{}>", user.full_name(), user.email());
            if user.is_admin() {
                println!("admin");
            }
            let credentials: Vec<&str> =
                user.credentials().iter().map(String::as_str).collect();
            println!("credentials: {}", credentials.join(", "));
            print_expiry(&user);
        }
        Command::Logout => {
            let user = client.restore();
            client.logout(&user).await?;
            println!("logged out");
        }
    }

    Ok(())
}

/// The login password: `from_env` when set, otherwise the first line of
/// `input`. Never taken from the command line, where other users could
/// read it.
fn read_password(from_env: Option<String>, mut input: impl BufRead) -> io::Result<String> {
    if let Some(password) = from_env.filter(|password| !password.is_empty()) {
        return Ok(password);
    }

    eprint!("password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty password"));
    }
    Ok(password)
}

fn print_expiry(user: &User) {
    let remaining_secs = user.expiration_ms() / 1000;
    if user.need_renew() {
        println!("expires in {remaining_secs}s (renewal due)");
    } else {
        println!("expires in {remaining_secs}s");
    }
}
