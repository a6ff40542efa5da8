use actix_web::{middleware::Condition, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use clap::Parser;
use log::{error, info};
use std::sync::Arc;
use sysagent::{
    cli::Cli,
    config::RelaySettings,
    debug_middleware::RequestDebugger,
    logging::init_logger,
    server::{self, AppState},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.debug { "debug" } else { cli.log_level.as_str() };
    let _logger = init_logger(log_level, cli.log_to_file)?;

    let settings = RelaySettings::from_cli(&cli).inspect_err(|e| error!("{e}, exiting"))?;
    let model = settings.build_model();

    let addr = settings.bind_addr();
    info!("Starting SysAgent relay...");
    info!("Server is running at http://{addr}");
    info!("Chat endpoint is at /api/chat");
    info!("  - Model: {}", settings.model);
    info!("  - Auth: {}", settings.auth);
    info!(
        "  - Proxy: {}",
        settings.proxy.as_deref().unwrap_or("none (direct)")
    );
    info!("  - Allowed origin: {}", settings.allowed_origin);
    if settings.debug {
        info!("Debug mode enabled - requests, prompts and replies will be logged");
    }

    let state = AppState::new(Arc::new(model), settings.system_prompt.clone())
        .with_debug(settings.debug);
    let allowed_origin = settings.allowed_origin.clone();
    let debug = settings.debug;

    HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(debug, RequestDebugger))
            .wrap(server::cors_policy(&allowed_origin))
            .app_data(web::Data::new(state.clone()))
            .configure(server::configure)
            .default_service(web::to(HttpResponse::NotFound))
    })
    .bind(&addr)?
    .run()
    .await
    .context("Failed to run HTTP server")
}
