//! # API Shared
//!
//! Shared utilities and definitions for the pacientes APIs.
//!
//! Contains:
//! - Protobuf-generated types (`pb` module), server and client stubs
//! - Shared services like `HealthService`
//! - Authentication utilities (usable by both gRPC and REST)
//! - Conversions between protobuf messages and `pacientes-core` parameters
//!
//! Used by `api-grpc`, `api-rest` and the CLI for common functionality.

// Re-export the generated protobuf module. The generated code will be placed
// into OUT_DIR at build time by the build script.
pub mod pb {
    tonic::include_proto!("pacientes.v1");
}

pub mod auth;
pub mod convert;
pub mod env;
pub mod health;

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("proto_descriptor");

pub use health::HealthService;
pub use pb::*;
