//! # API REST
//!
//! REST API implementation for the pacientes store.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for common types and utilities. Lookup and delete accept any JSON shape
//! and hand it to [`PatientService`] unchanged, so the HTTP surface tolerates the same
//! parameter shapes as gRPC.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::pb;
use api_shared::HealthService;
use pacientes_core::PatientService;

/// Application state for the REST API server
///
/// Contains shared state that needs to be accessible to all request handlers,
/// including the PatientService instance for data operations.
#[derive(Clone)]
pub struct AppState {
    patient_service: PatientService,
}

impl AppState {
    pub fn new(patient_service: PatientService) -> Self {
        Self { patient_service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        get_patient,
        lookup_patient,
        create_patient,
        update_patient,
        delete_patient,
    ),
    components(schemas(
        pb::HealthRes,
        pb::Patient,
        pb::PatientKey,
        pb::ListPatientsRes,
        pb::GetPatientRes,
        pb::CreatePatientReq,
        pb::CreatePatientRes,
        pb::UpdatePatientRes,
        pb::DeletePatientRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/patients",
            get(list_patients).post(create_patient).delete(delete_patient),
        )
        .route("/patients/lookup", post(lookup_patient))
        .route("/patients/:id", get(get_patient).put(update_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = pb::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the pacientes service.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<pb::HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "Every patient in document order", body = pb::ListPatientsRes)
    )
)]
/// List all patients
///
/// A corrupt or missing document reads as an empty list.
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Json<pb::ListPatientsRes> {
    let patients = state
        .patient_service
        .get_patients()
        .into_iter()
        .map(pb::Patient::from)
        .collect();

    Json(pb::ListPatientsRes { patients })
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient found", body = pb::Patient),
        (status = 404, description = "No patient with that id")
    )
)]
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<pb::Patient>, (StatusCode, &'static str)> {
    state
        .patient_service
        .get_patient(&Value::String(id))
        .map(|patient| Json(pb::Patient::from(patient)))
        .ok_or((StatusCode::NOT_FOUND, "Patient not found"))
}

#[utoipa::path(
    post,
    path = "/patients/lookup",
    request_body(
        content = pb::PatientKey,
        description = "A patient id as a number, a numeric string, or an object with an `id` field"
    ),
    responses(
        (status = 200, description = "Lookup result; `patient` is null when nothing matched", body = pb::GetPatientRes)
    )
)]
/// Look up a patient from a loosely-shaped parameter
#[axum::debug_handler]
async fn lookup_patient(
    State(state): State<AppState>,
    Json(param): Json<Value>,
) -> Json<pb::GetPatientRes> {
    let patient = state
        .patient_service
        .get_patient(&param)
        .map(pb::Patient::from);

    Json(pb::GetPatientRes { patient })
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = pb::CreatePatientReq,
    responses(
        (status = 201, description = "Patient created", body = pb::CreatePatientRes),
        (status = 400, description = "Invalid fields or the document could not be saved; id is 0", body = pb::CreatePatientRes)
    )
)]
/// Create a new patient
///
/// The new id is one more than the largest id in the document.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    Json(param): Json<Value>,
) -> (StatusCode, Json<pb::CreatePatientRes>) {
    let id = state.patient_service.create_patient(&param);
    let status = if id == 0 {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::CREATED
    };

    (status, Json(pb::CreatePatientRes { id }))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    request_body = pb::CreatePatientReq,
    responses(
        (status = 200, description = "Whether a patient was overwritten", body = pb::UpdatePatientRes)
    )
)]
/// Overwrite every field of a patient
///
/// The id in the path wins over any `id` in the body.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut param): Json<Value>,
) -> Json<pb::UpdatePatientRes> {
    if let Some(fields) = param.as_object_mut() {
        fields.insert("id".into(), Value::String(id));
    }
    let success = state.patient_service.update_patient(&param);

    Json(pb::UpdatePatientRes { success })
}

#[utoipa::path(
    delete,
    path = "/patients",
    request_body(
        content = pb::PatientKey,
        description = "The documento as a bare string or an object with a `documento` field"
    ),
    responses(
        (status = 200, description = "Whether a patient was removed", body = pb::DeletePatientRes)
    )
)]
/// Delete the first patient whose documento matches exactly
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    Json(param): Json<Value>,
) -> Json<pb::DeletePatientRes> {
    let success = state.patient_service.delete_patient(&param);

    Json(pb::DeletePatientRes { success })
}
