// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gezgin command-line client
//!
//! Drives the session manager and boundary resolver from a terminal: sign in,
//! look up a city, sign out.

use anyhow::{Context, Result};
use clap::Parser;
use gezgin_client::{
    app::{map, Screen},
    config::Config,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "gezgin_client=debug,info";

#[derive(Parser)]
#[command(name = "gezgin")]
#[command(version)]
#[command(about = "Gezgin travel client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the restored session state
    Status,
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GEZGIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GEZGIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Look up a city and print its boundary
    Search {
        /// City name, e.g. "Istanbul"
        city: Vec<String>,
        /// Theme color used to style the boundary overlay
        #[arg(long)]
        theme: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let state = AppState::new(config).context("Failed to initialize client")?;

    let session = state.session.restore().await;
    tracing::debug!(status = ?session.authenticated, "Session restored");

    match cli.command {
        Commands::Status => {
            let screen = Screen::for_session(&session);
            println!("{}", serde_json::to_string_pretty(&session_summary(&session))?);
            println!("screen: {:?}", screen);
        }
        Commands::Register { email, password } => {
            match state.session.register(&email, &password).await {
                Ok(_) => println!("Registered and signed in as {}", email),
                Err(e) => anyhow::bail!("{}", e.user_message()),
            }
        }
        Commands::Login { email, password } => match state.session.login(&email, &password).await {
            Ok(_) => println!("Signed in as {}", email),
            Err(e) => anyhow::bail!("Login failed: {}", e.user_message()),
        },
        Commands::Logout => {
            state
                .session
                .logout()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Signed out");
        }
        Commands::Search { city, theme } => {
            if Screen::for_session(&session) != Screen::MainApp {
                anyhow::bail!("Sign in first (gezgin login --email ...)");
            }
            if let Some(color) = theme {
                state.session.set_theme_color(color);
            }

            let input = city.join(" ");
            let Some(update) = map::search(&state.resolver, &input).await else {
                anyhow::bail!("Enter a city name to search for");
            };

            let theme_color = state.session.snapshot().theme_color;
            let style = map::PolygonStyle::from_theme(&theme_color);
            print_update(&update, style.as_ref());
        }
    }

    Ok(())
}

/// Session view without the raw token.
fn session_summary(session: &gezgin_client::models::Session) -> serde_json::Value {
    serde_json::json!({
        "authenticated": session.authenticated.as_bool(),
        "hasToken": session.token.is_some(),
        "themeColor": session.theme_color,
    })
}

fn print_update(update: &map::MapUpdate, style: Option<&map::PolygonStyle>) {
    if let Some(message) = update.message {
        println!("{}", message);
    }
    match &update.camera {
        Some(map::CameraMove::FitToCoordinates { bounds, .. }) => println!(
            "fit: center ({:.5}, {:.5}) span ({:.4}, {:.4})",
            bounds.latitude, bounds.longitude, bounds.latitude_delta, bounds.longitude_delta
        ),
        Some(map::CameraMove::AnimateToRegion { region, .. }) => println!(
            "center: ({:.5}, {:.5})",
            region.latitude, region.longitude
        ),
        None => {}
    }
    if !update.polygon.is_empty() {
        println!("boundary: {} points", update.polygon.len());
        if let Some(style) = style {
            println!("stroke {} fill {}", style.stroke_color, style.fill_color);
        }
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(format)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_theme_is_a_search_option() {
        let cli = Cli::try_parse_from(["gezgin", "search", "Van", "--theme", "#FF0000"]).unwrap();
        match cli.command {
            Commands::Search { city, theme } => {
                assert_eq!(city, vec!["Van".to_string()]);
                assert_eq!(theme.as_deref(), Some("#FF0000"));
            }
            _ => panic!("expected search"),
        }

        assert!(Cli::try_parse_from(["gezgin", "theme", "#FF0000"]).is_err());
    }
}
