//! # Billing Resource Helpers
//!
//! Thin compositions of the four transport verbs with the fixed path templates of the
//! billing API. Available on every [`ApiTransport`] through the [`BillingApi`] extension.

use async_trait::async_trait;
use serde_json::Value;

use crate::api_clients::paths::{claim_payments, Resource, ResourceId};
use crate::error::ClientResult;
use crate::transport::{ApiTransport, QueryParams};

/// Typed helpers for patients, providers, services, appointments, claims and payments
#[async_trait]
pub trait BillingApi: ApiTransport {
    // ===================================================================================
    // GENERIC CRUD
    // ===================================================================================

    /// `GET /{collection}` with query passthrough
    async fn list(&self, resource: Resource, query: &QueryParams) -> ClientResult<Value> {
        self.read(&resource.collection(), query).await
    }

    /// `GET /{collection}/{id}`
    async fn fetch(&self, resource: Resource, id: &ResourceId) -> ClientResult<Value> {
        self.read(&resource.member(id), &QueryParams::new()).await
    }

    /// `POST /{collection}`
    async fn create_in(&self, resource: Resource, data: &Value) -> ClientResult<Value> {
        self.create(&resource.collection(), data, &QueryParams::new())
            .await
    }

    /// `PUT /{collection}/{id}`
    async fn update_in(
        &self,
        resource: Resource,
        id: &ResourceId,
        data: &Value,
    ) -> ClientResult<Value> {
        self.replace(&resource.member(id), data).await
    }

    /// `DELETE /{collection}/{id}`
    async fn delete_from(&self, resource: Resource, id: &ResourceId) -> ClientResult<Value> {
        self.remove(&resource.member(id)).await
    }

    // ===================================================================================
    // PATIENTS
    // ===================================================================================

    async fn get_patients(&self) -> ClientResult<Value> {
        self.list(Resource::Patients, &QueryParams::new()).await
    }

    async fn get_patient(&self, id: &ResourceId) -> ClientResult<Value> {
        self.fetch(Resource::Patients, id).await
    }

    async fn create_patient(&self, data: &Value) -> ClientResult<Value> {
        self.create_in(Resource::Patients, data).await
    }

    async fn update_patient(&self, id: &ResourceId, data: &Value) -> ClientResult<Value> {
        self.update_in(Resource::Patients, id, data).await
    }

    async fn delete_patient(&self, id: &ResourceId) -> ClientResult<Value> {
        self.delete_from(Resource::Patients, id).await
    }

    // ===================================================================================
    // PROVIDERS
    // ===================================================================================

    async fn get_providers(&self) -> ClientResult<Value> {
        self.list(Resource::Providers, &QueryParams::new()).await
    }

    async fn get_provider(&self, id: &ResourceId) -> ClientResult<Value> {
        self.fetch(Resource::Providers, id).await
    }

    async fn create_provider(&self, data: &Value) -> ClientResult<Value> {
        self.create_in(Resource::Providers, data).await
    }

    async fn update_provider(&self, id: &ResourceId, data: &Value) -> ClientResult<Value> {
        self.update_in(Resource::Providers, id, data).await
    }

    async fn delete_provider(&self, id: &ResourceId) -> ClientResult<Value> {
        self.delete_from(Resource::Providers, id).await
    }

    // ===================================================================================
    // SERVICES
    // ===================================================================================

    async fn get_services(&self) -> ClientResult<Value> {
        self.list(Resource::Services, &QueryParams::new()).await
    }

    async fn get_service(&self, id: &ResourceId) -> ClientResult<Value> {
        self.fetch(Resource::Services, id).await
    }

    async fn create_service(&self, data: &Value) -> ClientResult<Value> {
        self.create_in(Resource::Services, data).await
    }

    async fn update_service(&self, id: &ResourceId, data: &Value) -> ClientResult<Value> {
        self.update_in(Resource::Services, id, data).await
    }

    async fn delete_service(&self, id: &ResourceId) -> ClientResult<Value> {
        self.delete_from(Resource::Services, id).await
    }

    // ===================================================================================
    // APPOINTMENTS
    // ===================================================================================

    async fn get_appointments(&self, query: &QueryParams) -> ClientResult<Value> {
        self.list(Resource::Appointments, query).await
    }

    async fn get_appointment(&self, id: &ResourceId) -> ClientResult<Value> {
        self.fetch(Resource::Appointments, id).await
    }

    async fn create_appointment(&self, data: &Value) -> ClientResult<Value> {
        self.create_in(Resource::Appointments, data).await
    }

    async fn update_appointment(&self, id: &ResourceId, data: &Value) -> ClientResult<Value> {
        self.update_in(Resource::Appointments, id, data).await
    }

    async fn delete_appointment(&self, id: &ResourceId) -> ClientResult<Value> {
        self.delete_from(Resource::Appointments, id).await
    }

    // ===================================================================================
    // CLAIMS
    // ===================================================================================

    async fn get_claims(&self, query: &QueryParams) -> ClientResult<Value> {
        self.list(Resource::Claims, query).await
    }

    async fn get_claim(&self, id: &ResourceId) -> ClientResult<Value> {
        self.fetch(Resource::Claims, id).await
    }

    async fn create_claim(&self, data: &Value) -> ClientResult<Value> {
        self.create_in(Resource::Claims, data).await
    }

    async fn update_claim(&self, id: &ResourceId, data: &Value) -> ClientResult<Value> {
        self.update_in(Resource::Claims, id, data).await
    }

    async fn delete_claim(&self, id: &ResourceId) -> ClientResult<Value> {
        self.delete_from(Resource::Claims, id).await
    }

    // ===================================================================================
    // PAYMENTS (listed and created under their claim)
    // ===================================================================================

    /// `GET /claims/{claim_id}/payments`
    async fn get_payments_for_claim(&self, claim_id: &ResourceId) -> ClientResult<Value> {
        self.read(&claim_payments(claim_id), &QueryParams::new())
            .await
    }

    async fn get_payment(&self, id: &ResourceId) -> ClientResult<Value> {
        self.fetch(Resource::Payments, id).await
    }

    /// `POST /claims/{claim_id}/payments`
    async fn create_payment_for_claim(
        &self,
        claim_id: &ResourceId,
        data: &Value,
    ) -> ClientResult<Value> {
        self.create(&claim_payments(claim_id), data, &QueryParams::new())
            .await
    }

    async fn update_payment(&self, id: &ResourceId, data: &Value) -> ClientResult<Value> {
        self.update_in(Resource::Payments, id, data).await
    }

    async fn delete_payment(&self, id: &ResourceId) -> ClientResult<Value> {
        self.delete_from(Resource::Payments, id).await
    }
}

impl<T: ApiTransport + ?Sized> BillingApi for T {}
