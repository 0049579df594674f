//! Build script for the `api-shared` crate.
//!
//! ## Purpose
//! Generates Rust protobuf types from `pacientes.proto` and emits a file-descriptor set.
//!
//! ## Intended use
//! The generated types are shared by the gRPC server, the REST API and the CLI client. The
//! descriptor set is used for gRPC reflection.
//!
//! Messages with plain fields also derive serde and OpenAPI schemas so the REST API can use
//! them as JSON bodies. Requests carrying a `oneof` are gRPC-only.

const JSON_MESSAGES: &[&str] = &[
    ".pacientes.v1.HealthRes",
    ".pacientes.v1.Patient",
    ".pacientes.v1.ListPatientsRes",
    ".pacientes.v1.PatientKey",
    ".pacientes.v1.GetPatientRes",
    ".pacientes.v1.CreatePatientReq",
    ".pacientes.v1.CreatePatientRes",
    ".pacientes.v1.UpdatePatientReq",
    ".pacientes.v1.UpdatePatientRes",
    ".pacientes.v1.DeletePatientRes",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let proto_file = std::path::Path::new(manifest_dir).join("pacientes.proto");
    let proto_include_root = std::path::Path::new(manifest_dir);

    println!("cargo:rerun-if-changed={}", proto_file.display());

    let mut builder = tonic_build::configure()
        .build_server(true)
        .build_client(true);
    for path in JSON_MESSAGES {
        builder = builder.type_attribute(
            path,
            "#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]",
        );
    }

    builder
        .file_descriptor_set_path(
            std::path::Path::new(&std::env::var("OUT_DIR")?).join("proto_descriptor.bin"),
        )
        .compile_protos(std::slice::from_ref(&proto_file), &[proto_include_root])?;

    Ok(())
}
