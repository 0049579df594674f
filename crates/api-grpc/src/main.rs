//! Standalone gRPC server binary.
//!
//! Runs the gRPC API on its own. The workspace's main `pacientes-run` binary runs both gRPC
//! and REST concurrently.

use std::net::SocketAddr;
use tonic::transport::Server;
use tonic_reflection::server::Builder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::{auth_interceptor, pb::pacientes_server::PacientesServer, PacientesService};
use api_shared::{env, FILE_DESCRIPTOR_SET};
use pacientes_core::PatientService;

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

    let addr: SocketAddr = std::env::var("PACIENTES_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:50051".into())
        .parse()?;

    let cfg = env::core_config_from_env()?;
    tracing::info!("-- Using patient document {}", cfg.document_path().display());
    tracing::info!("-- Starting pacientes gRPC on {}", addr);

    let svc = PacientesService::new(PatientService::new(&cfg)?);
    let mut server_builder =
        Server::builder().add_service(PacientesServer::with_interceptor(svc, auth_interceptor));

    if env::reflection_enabled() {
        let reflection_service = Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        server_builder = server_builder.add_service(reflection_service);
        tracing::info!("gRPC server reflection enabled");
    } else {
        tracing::info!("gRPC server reflection disabled");
    }

    server_builder.serve(addr).await?;

    Ok(())
}
