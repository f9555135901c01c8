//! TIM IQ Playground Toolkit
//!
//! A small web application that rewrites pasted text or fetched articles with
//! one of ten prompt-engineered tools, shows the rewrite next to an analysis
//! of what changed, and exports both as a standalone HTML report.

mod api;
mod core;
mod input;
mod models;
mod report;
mod session;
mod tools;
mod ui;

use crate::api::endpoints::{AppState, create_router};
use crate::core::config::Config;
use crate::core::constants::APP_NAME;
use crate::core::generation::GenerationClient;
use crate::core::logging::init_logging;
use crate::core::pipeline::Pipeline;
use crate::core::provider::{Provider, ProviderType};
use crate::core::providers::{OpenAIProvider, OpenRouterProvider};
use crate::input::InputResolver;
use crate::session::{FunFacts, SessionStore};
use crate::ui::Branding;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// How often idle sessions are swept from the store
const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    dotenv::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);
    print_startup_banner(&config);

    let state = match build_state(config.clone()) {
        Ok(state) => state,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Using provider: {} (model {})",
        state.pipeline.generator().provider_name(),
        state.pipeline.generator().model()
    );

    spawn_session_pruning(state.sessions.clone());
    let app = create_router(state);

    // Bind to address
    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Wire the provider, pipeline and session store from configuration
fn build_state(config: Arc<Config>) -> Result<AppState> {
    let provider: Arc<dyn Provider> = match config.provider {
        ProviderType::OpenAI => Arc::new(OpenAIProvider::new(
            config.base_url.clone(),
            config.request_timeout,
            config.azure_api_version.clone(),
        )?),
        ProviderType::OpenRouter => Arc::new(OpenRouterProvider::new(
            config.base_url.clone(),
            config.request_timeout,
            config.openrouter_site_url.clone(),
            config.openrouter_app_name.clone(),
        )?),
    };

    let generator = GenerationClient::from_config(provider, &config);
    let resolver = InputResolver::new(config.fetch_timeout)?;
    let branding = Branding::load(&config.logo_path, config.logo_width);

    Ok(AppState {
        pipeline: Arc::new(Pipeline::new(resolver, generator)),
        sessions: SessionStore::new(config.session_idle_timeout),
        fun_facts: Arc::new(FunFacts::from_entropy()),
        branding: Arc::new(branding),
        config,
    })
}

/// Sweep idle sessions in the background for the lifetime of the server
fn spawn_session_pruning(sessions: SessionStore) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let pruned = sessions.prune_idle(chrono::Utc::now()).await;
            if pruned > 0 {
                info!("Dropped {} idle sessions", pruned);
            }
        }
    });
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
    println!("   Provider: {:?}", config.provider);
    println!("   Base URL: {}", config.base_url);
    println!("   Model: {}", config.model);
    println!("   Max Output Tokens: {}", config.max_output_tokens);
    println!("   Request Timeout: {}s", config.request_timeout);
    println!("   Fetch Timeout: {}s", config.fetch_timeout);
    println!("   Logo: {}", config.logo_path.display());
    println!("   Session Idle Timeout: {}s", config.session_idle_timeout);
    println!("   Server: {}:{}", config.host, config.port);
    println!();
}

/// Print help message
fn print_help() {
    println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: tim-playground [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Environment variables:");
    println!("  CONFIG_PATH - Path to the TOML configuration (default: config.toml)");
    println!("  RUST_LOG    - Overrides server.log_level");
    println!();
    println!("Configuration sections (all optional):");
    println!("  provider = \"openai\" | \"openrouter\"");
    println!("  [openai]      base_url, azure_api_version");
    println!("  [openrouter]  base_url, site_url, app_name");
    println!("  [generation]  model (gpt-4o), max_output_tokens (1800), system_prompt");
    println!("  [server]      host (0.0.0.0), port (8501), log_level (info),");
    println!("                session_idle_timeout (3600)");
    println!("  [request]     request_timeout (90), fetch_timeout (30)");
    println!("  [branding]    logo_path (./tim_logo.png), logo_width (200)");
    println!();
    println!("The OpenAI API key is entered in the browser and kept per session.");
}
