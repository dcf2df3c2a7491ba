use clap::Parser;
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use ledgertrail_backend::api::{AuditApi, HealthApi};
use ledgertrail_backend::app_data::AppData;
use ledgertrail_backend::cli::{self, Cli};
use ledgertrail_backend::config::{self, AppSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::init_logging()?;

    let settings = AppSettings::from_env();

    let db = config::connect_audit_database(&settings.audit_database_url).await?;
    config::migrate_audit_database(&db).await?;

    let app_data = AppData::init(db, settings.database_file());

    match Cli::parse().command {
        Some(command) => cli::execute_command(command, &app_data).await?,
        None => serve(&settings, &app_data).await?,
    }

    Ok(())
}

async fn serve(settings: &AppSettings, app_data: &AppData) -> Result<(), std::io::Error> {
    let audit_api = AuditApi::new(
        app_data.query_service.clone(),
        app_data.maintenance_service.clone(),
    );

    let api_service = OpenApiService::new(
        (HealthApi, audit_api),
        "Ledgertrail Audit API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}/api", settings.bind_addr()));

    let ui = api_service.swagger_ui();

    // Compose routes: API under /api, Swagger UI under /swagger
    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!("Starting audit backend on http://{}", settings.bind_addr());
    tracing::info!("Swagger UI available at http://{}/swagger", settings.bind_addr());

    Server::new(TcpListener::bind(settings.bind_addr()))
        .run(app)
        .await
}
