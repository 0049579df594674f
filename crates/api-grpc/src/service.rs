// Re-export the proto module from the shared `api-shared` crate so callers
// can reference `api_grpc::pb`.
pub use api_shared::pb;

use api_shared::auth::{self, API_KEY_HEADER};
use api_shared::convert;
use api_shared::HealthService;
use pacientes_core::PatientService;
use tonic::{Request, Response, Status};

use api_shared::pb::{
    pacientes_server::Pacientes, CreatePatientReq, CreatePatientRes, DeletePatientReq,
    DeletePatientRes, GetPatientReq, GetPatientRes, HealthRes, ListPatientsRes,
    UpdatePatientReq, UpdatePatientRes,
};

/// Authentication interceptor for gRPC requests
#[allow(clippy::result_large_err)]
pub fn auth_interceptor(req: Request<()>) -> Result<Request<()>, Status> {
    let api_key = req
        .metadata()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Status::unauthenticated("Missing x-api-key header"))?;

    auth::validate_api_key(api_key)?;
    Ok(req)
}

/// gRPC front of [`PatientService`].
///
/// Failures are reported in-band the same way the core facade reports them: an absent
/// patient, an id of `0`, or `success = false`. Transport-level errors are reserved for
/// authentication.
#[derive(Clone, Debug)]
pub struct PacientesService {
    patient_service: PatientService,
}

impl PacientesService {
    pub fn new(patient_service: PatientService) -> Self {
        Self { patient_service }
    }
}

#[tonic::async_trait]
impl Pacientes for PacientesService {
    async fn health(&self, _req: Request<()>) -> Result<Response<HealthRes>, Status> {
        Ok(Response::new(HealthService::check_health()))
    }

    async fn get_patients(&self, _req: Request<()>) -> Result<Response<ListPatientsRes>, Status> {
        let patients = self
            .patient_service
            .get_patients()
            .into_iter()
            .map(pb::Patient::from)
            .collect();

        Ok(Response::new(ListPatientsRes { patients }))
    }

    async fn get_patient(
        &self,
        req: Request<GetPatientReq>,
    ) -> Result<Response<GetPatientRes>, Status> {
        let param = convert::get_patient_param(req.into_inner());
        let patient = self
            .patient_service
            .get_patient(&param)
            .map(pb::Patient::from);

        Ok(Response::new(GetPatientRes { patient }))
    }

    async fn create_patient(
        &self,
        req: Request<CreatePatientReq>,
    ) -> Result<Response<CreatePatientRes>, Status> {
        let param = convert::create_patient_param(req.into_inner());
        let id = self.patient_service.create_patient(&param);

        Ok(Response::new(CreatePatientRes { id }))
    }

    async fn update_patient(
        &self,
        req: Request<UpdatePatientReq>,
    ) -> Result<Response<UpdatePatientRes>, Status> {
        let param = convert::update_patient_param(req.into_inner());
        let success = self.patient_service.update_patient(&param);

        Ok(Response::new(UpdatePatientRes { success }))
    }

    async fn delete_patient(
        &self,
        req: Request<DeletePatientReq>,
    ) -> Result<Response<DeletePatientRes>, Status> {
        let param = convert::delete_patient_param(req.into_inner());
        let success = self.patient_service.delete_patient(&param);

        Ok(Response::new(DeletePatientRes { success }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacientes_core::CoreConfig;
    use pb::{delete_patient_req, get_patient_req};
    use tempfile::TempDir;

    fn test_service(temp_dir: &TempDir) -> PacientesService {
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf(), "pacientes.xml")
            .expect("CoreConfig::new should succeed");
        PacientesService::new(PatientService::new(&cfg).expect("PatientService::new should succeed"))
    }

    fn ana() -> CreatePatientReq {
        CreatePatientReq {
            nombre: "Ana".into(),
            apellido: "Diaz".into(),
            documento: "123".into(),
            edad: 30,
            sexo: "F".into(),
            telefono: None,
            direccion: None,
            fecha_registro: "2024-01-01".into(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_by_each_shape() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let svc = test_service(&temp_dir);

        let created = svc
            .create_patient(Request::new(ana()))
            .await
            .expect("create should respond")
            .into_inner();
        assert_eq!(created.id, 1);

        for param in [
            get_patient_req::Param::Id(1),
            get_patient_req::Param::Raw("1".into()),
            get_patient_req::Param::Key(pb::PatientKey {
                id: Some(1),
                documento: None,
            }),
        ] {
            let res = svc
                .get_patient(Request::new(GetPatientReq { param: Some(param) }))
                .await
                .expect("get should respond")
                .into_inner();
            let patient = res.patient.expect("patient 1 should exist");
            assert_eq!(patient.nombre, "Ana");
            assert_eq!(patient.telefono, "");
        }
    }

    #[tokio::test]
    async fn test_get_missing_patient_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let svc = test_service(&temp_dir);

        let res = svc
            .get_patient(Request::new(GetPatientReq {
                param: Some(get_patient_req::Param::Id(5)),
            }))
            .await
            .expect("get should respond")
            .into_inner();
        assert!(res.patient.is_none());

        let res = svc
            .get_patient(Request::new(GetPatientReq { param: None }))
            .await
            .expect("get should respond")
            .into_inner();
        assert!(res.patient.is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_report_success_in_band() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let svc = test_service(&temp_dir);
        svc.create_patient(Request::new(ana()))
            .await
            .expect("create should respond");

        let update = UpdatePatientReq {
            id: 1,
            nombre: "Ana".into(),
            apellido: "Diaz".into(),
            documento: "123".into(),
            edad: 31,
            sexo: "F".into(),
            telefono: Some("555-0101".into()),
            direccion: None,
            fecha_registro: "2024-01-01".into(),
        };
        let res = svc
            .update_patient(Request::new(update.clone()))
            .await
            .expect("update should respond")
            .into_inner();
        assert!(res.success);

        let res = svc
            .update_patient(Request::new(UpdatePatientReq { id: 9, ..update }))
            .await
            .expect("update should respond")
            .into_inner();
        assert!(!res.success);

        let blank = DeletePatientReq {
            param: Some(delete_patient_req::Param::Documento("  ".into())),
        };
        let res = svc
            .delete_patient(Request::new(blank))
            .await
            .expect("delete should respond")
            .into_inner();
        assert!(!res.success);

        let keyed = DeletePatientReq {
            param: Some(delete_patient_req::Param::Key(pb::PatientKey {
                id: None,
                documento: Some("123".into()),
            })),
        };
        let res = svc
            .delete_patient(Request::new(keyed))
            .await
            .expect("delete should respond")
            .into_inner();
        assert!(res.success);

        let list = svc
            .get_patients(Request::new(()))
            .await
            .expect("list should respond")
            .into_inner();
        assert!(list.patients.is_empty());
    }

    #[test]
    fn test_auth_interceptor_requires_header() {
        let status = auth_interceptor(Request::new(())).expect_err("missing header should fail");
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }
}
