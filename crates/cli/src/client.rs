//! Thin wrapper over the generated gRPC client.

use crate::error::{ClientError, ClientResult};
use api_shared::auth::API_KEY_HEADER;
use api_shared::pb::{
    self, delete_patient_req, get_patient_req, pacientes_client::PacientesClient,
};
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::Channel;
use tonic::Request;

pub struct PatientsClient {
    inner: PacientesClient<Channel>,
    api_key: MetadataValue<Ascii>,
}

impl PatientsClient {
    pub async fn connect(url: String, api_key: &str) -> ClientResult<Self> {
        let api_key = MetadataValue::try_from(api_key)?;
        let inner = PacientesClient::connect(url).await?;
        Ok(Self { inner, api_key })
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut req = Request::new(message);
        req.metadata_mut().insert(API_KEY_HEADER, self.api_key.clone());
        req
    }

    pub async fn health(&mut self) -> ClientResult<pb::HealthRes> {
        let req = self.request(());
        Ok(self.inner.health(req).await?.into_inner())
    }

    pub async fn list(&mut self) -> ClientResult<Vec<pb::Patient>> {
        let req = self.request(());
        Ok(self.inner.get_patients(req).await?.into_inner().patients)
    }

    pub async fn get(&mut self, id: i64) -> ClientResult<Option<pb::Patient>> {
        let req = self.request(pb::GetPatientReq {
            param: Some(get_patient_req::Param::Id(id)),
        });
        Ok(self.inner.get_patient(req).await?.into_inner().patient)
    }

    /// Returns the new id; the server signals a rejected create with id `0`.
    pub async fn create(&mut self, patient: pb::CreatePatientReq) -> ClientResult<i64> {
        let req = self.request(patient);
        match self.inner.create_patient(req).await?.into_inner().id {
            0 => Err(ClientError::Rejected("patient was not created")),
            id => Ok(id),
        }
    }

    pub async fn update(&mut self, patient: pb::UpdatePatientReq) -> ClientResult<bool> {
        let req = self.request(patient);
        Ok(self.inner.update_patient(req).await?.into_inner().success)
    }

    pub async fn delete(&mut self, documento: String) -> ClientResult<bool> {
        let req = self.request(pb::DeletePatientReq {
            param: Some(delete_patient_req::Param::Documento(documento)),
        });
        Ok(self.inner.delete_patient(req).await?.into_inner().success)
    }
}
