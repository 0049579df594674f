use std::net::SocketAddr;
use tonic::transport::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::{PacientesService, auth_interceptor};
use api_rest::{AppState, router};
use api_shared::env;
use api_shared::pb::pacientes_server::PacientesServer;
use pacientes_core::PatientService;

/// Main entry point for the pacientes application
///
/// Starts both gRPC and REST servers concurrently over one shared `PatientService`, so both
/// surfaces serialise their writes through the same lock:
/// - gRPC server on port 50051 (configurable via PACIENTES_ADDR)
/// - REST server on port 3000 (configurable via PACIENTES_REST_ADDR)
///
/// The gRPC server requires authentication via x-api-key header.
/// The REST server provides open access to patient operations.
///
/// # Environment Variables
/// - `PACIENTES_ADDR`: gRPC server address (default: "0.0.0.0:50051")
/// - `PACIENTES_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_DATA_DIR`: Directory holding the patient document (default: "patient_data")
/// - `PACIENTES_DOCUMENT`: Document file name (default: "pacientes.xml")
/// - `API_KEY`: API key for gRPC authentication
///
/// # Returns
/// * `Ok(())` - If servers start and run successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pacientes=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let grpc_addr: SocketAddr = std::env::var("PACIENTES_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:50051".into())
        .parse()?;
    let rest_addr = std::env::var("PACIENTES_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = env::core_config_from_env()?;
    let patient_service = PatientService::new(&cfg)?;

    tracing::info!("++ Using patient document {}", cfg.document_path().display());
    tracing::info!("++ Starting pacientes gRPC on {}", grpc_addr);
    tracing::info!("++ Starting pacientes REST on {}", rest_addr);

    // Start REST server
    let rest_app = router(AppState::new(patient_service.clone()));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    let rest_server = tokio::spawn(async move { axum::serve(listener, rest_app).await });

    // Start gRPC server
    let grpc_server = Server::builder()
        .add_service(PacientesServer::with_interceptor(
            PacientesService::new(patient_service),
            auth_interceptor,
        ))
        .serve(grpc_addr);

    // Run both
    let (rest_result, grpc_result) = tokio::join!(rest_server, grpc_server);
    rest_result??;
    grpc_result?;

    Ok(())
}
