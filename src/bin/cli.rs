//! Community Platform CLI
//!
//! Drives the Role Router from the command line against a file-backed
//! session, so a login survives between invocations:
//! - Log in and out
//! - Show the current session
//! - Check link clicks, page loads and sidebar links
//! - Generate a config file

use clap::{Parser, Subcommand};
use community_platform::api::dto::{
    LoginResponse, LogoutResponse, NavigateResponse, PagePathResponse, SessionResponse,
};
use community_platform::config::Config;
use community_platform::router::{NavDecision, RoleRouter};
use community_platform::session::FileSessionStore;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "community-platform")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Role-scoped navigation for the Community Platform")]
#[command(long_about = "Log in as a director, editor or music director and see where the site sends you.\nThe role is derived from the username.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory holding the CLI session (default: from config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in; the role is derived from the username
    Login {
        /// Username
        username: String,
        /// Accepted for parity with the login form, never checked
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out
    Logout,

    /// Show the current session
    Whoami,

    /// Check where a link click on HREF ends up
    Navigate {
        /// Link target, e.g. /profile
        href: String,
    },

    /// Check whether loading PATH redirects
    Load {
        /// Page path, e.g. /login
        path: String,
    },

    /// Role-scoped path for a logical page (dashboard, community, workspaces, profile)
    Path {
        /// Page key
        page: String,
    },

    /// Rewrite a sidebar link for the current role
    Sidebar {
        /// Sidebar href, e.g. /community
        href: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "community_platform=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let json = match cli.format.as_str() {
        "json" => true,
        "table" => false,
        other => {
            eprintln!("Unknown format '{}', expected table or json", other);
            std::process::exit(2);
        }
    };

    if let Commands::Config { output } = &cli.command {
        let config = community_platform::config::generate_default_config();

        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &config)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", config),
        }
        return Ok(());
    }

    let session_path = match &cli.data_dir {
        Some(dir) => dir.join("cli_session.json"),
        None => Config::load_default().session.cli_session_path(),
    };
    tracing::debug!("Session file: {:?}", session_path);

    let router = RoleRouter::new(FileSessionStore::new(session_path));

    match cli.command {
        Commands::Login { username, .. } => {
            if username.trim().is_empty() {
                eprintln!("Username is required");
                std::process::exit(1);
            }

            let outcome = router.login(&username)?;
            let response = LoginResponse {
                session: SessionResponse::from(Some(&outcome.session)),
                redirect: outcome.redirect,
            };

            if json {
                print_json(&response)?;
            } else {
                println!(
                    "Logged in as {} ({})",
                    outcome.session.username,
                    outcome.session.role.display_name()
                );
                println!("Redirect: {}", response.redirect);
            }
        }

        Commands::Logout => {
            let redirect = router.logout()?;

            if json {
                print_json(&LogoutResponse { redirect })?;
            } else {
                println!("Logged out");
                println!("Redirect: {}", redirect);
            }
        }

        Commands::Whoami => {
            let session = router.session()?;

            if json {
                print_json(&SessionResponse::from(session.as_ref()))?;
            } else {
                match session {
                    Some(session) => {
                        println!("{:<12} {}", "Username", session.username);
                        println!("{:<12} {}", "Role", session.role.display_name());
                        println!("{:<12} {}", "Theme", session.role.theme_class());
                    }
                    None => {
                        println!("Not logged in.");
                        println!();
                        println!("Log in with:");
                        println!("  community-platform-cli login <username>");
                    }
                }
            }
        }

        Commands::Navigate { href } => {
            let decision = router.navigate(&href)?;
            let response = NavigateResponse::new(href, &decision);

            if json {
                print_json(&response)?;
            } else {
                println!("{:<12} {:<10} {}", "Href", "Action", "Target");
                println!("{}", "-".repeat(48));
                println!("{:<12} {:<10} {}", response.href, response.action, response.target);
            }
        }

        Commands::Load { path } => {
            let decision = match router.page_load(&path)? {
                Some(target) => NavDecision::Redirect(target),
                None => NavDecision::Allow,
            };
            let response = NavigateResponse::new(path, &decision);

            if json {
                print_json(&response)?;
            } else if decision.is_redirect() {
                println!("{} redirects to {}", response.href, response.target);
            } else {
                println!("{} stays put", response.href);
            }
        }

        Commands::Path { page } => match router.destination_for(&page) {
            Ok(path) => {
                if json {
                    print_json(&PagePathResponse { page, path })?;
                } else {
                    println!("{}", path);
                }
            }
            Err(e) if e.is_client_error() => {
                eprintln!("{}", e);
                eprintln!("Known pages: dashboard, community, workspaces, profile");
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },

        Commands::Sidebar { href } => {
            let rewritten = router.sidebar_href(&href)?;

            if json {
                print_json(&serde_json::json!({ "href": href, "target": rewritten }))?;
            } else {
                println!("{}", rewritten);
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
