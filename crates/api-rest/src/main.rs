//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging when you only want the REST server (with
//! OpenAPI/Swagger UI). The workspace's main `pacientes-run` binary runs both gRPC and REST
//! concurrently.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use api_shared::env;
use pacientes_core::PatientService;

/// Main entry point for the pacientes REST API server
///
/// # Environment Variables
/// - `PACIENTES_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PATIENT_DATA_DIR`: Directory holding the patient document (default: "patient_data")
/// - `PACIENTES_DOCUMENT`: Document file name (default: "pacientes.xml")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the document cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PACIENTES_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = env::core_config_from_env()?;
    let patient_service = PatientService::new(&cfg)?;

    tracing::info!("-- Starting pacientes REST API on {}", addr);

    let app = router(AppState::new(patient_service));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
