//! JSON REST handlers for devices.
//!
//! Bodies are read as raw bytes and decoded by the domain so that the request
//! `Content-Type` is not enforced and decode failures carry the decoder's own
//! message.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use devreg_app::ports::DeviceRepository;
use devreg_domain::device::{Device, DeviceAttributes};
use devreg_domain::error::{NotFoundError, RegistryError};
use devreg_domain::id::DeviceId;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<Device>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Device>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn device_not_found(id: String) -> ApiError {
    ApiError::from(RegistryError::from(NotFoundError {
        entity: "Device",
        id,
    }))
}

/// A path segment that is not a valid id can never match a device, and
/// neither can one that fails to extract (e.g. percent-encoded invalid UTF-8).
fn parse_device_id(path: Result<Path<String>, PathRejection>) -> Result<DeviceId, ApiError> {
    let Path(raw) = path.map_err(|rejection| device_not_found(rejection.body_text()))?;
    DeviceId::from_str(&raw).map_err(|_| device_not_found(raw))
}

fn decode(body: &[u8]) -> Result<DeviceAttributes, RegistryError> {
    DeviceAttributes::from_json(body).map_err(RegistryError::from)
}

/// `GET /devices`
pub async fn list<DR>(State(state): State<AppState<DR>>) -> Result<ListResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let devices = state.device_service.list_devices().await?;
    Ok(ListResponse::Ok(Json(devices)))
}

/// `GET /devices/{id}`
pub async fn get<DR>(
    State(state): State<AppState<DR>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<GetResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let device_id = parse_device_id(path)?;
    let device = state.device_service.get_device(device_id).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /devices`
pub async fn create<DR>(
    State(state): State<AppState<DR>>,
    body: Bytes,
) -> Result<CreateResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let attributes = decode(&body)?;
    let created = state.device_service.create_device(attributes).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /devices/{id}`
pub async fn update<DR>(
    State(state): State<AppState<DR>>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<GetResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let device_id = parse_device_id(path)?;
    let attributes = match decode(&body) {
        Ok(attributes) => attributes,
        Err(err) => {
            // An unknown id answers 404 even when the body is malformed.
            state.device_service.get_device(device_id).await?;
            return Err(err.into());
        }
    };
    let updated = state
        .device_service
        .update_device(device_id, attributes)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /devices/{id}`
pub async fn delete<DR>(
    State(state): State<AppState<DR>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<DeleteResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let device_id = parse_device_id(path)?;
    state.device_service.delete_device(device_id).await?;
    Ok(DeleteResponse::NoContent)
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use devreg_adapter_storage_memory::InMemoryDeviceRepository;
    use devreg_app::services::device_service::DeviceService;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    const ACME_X1: &str = r#"{"brand":"Acme","model":"X1","color":"black","ram":"4GB","rom":"64GB"}"#;

    fn app() -> Router {
        crate::router::build(AppState::new(DeviceService::new(
            InMemoryDeviceRepository::new(),
        )))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> Response {
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
        app.clone()
            .oneshot(Request::builder().method(method).uri(uri).body(body).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(resp: Response) -> Vec<u8> {
        resp.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    async fn body_json(resp: Response) -> Value {
        serde_json::from_slice(&body_bytes(resp).await).unwrap()
    }

    #[tokio::test]
    async fn should_create_device_with_assigned_id() {
        let app = app();

        let resp = send(&app, Method::POST, "/devices", Some(ACME_X1)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            body_json(resp).await,
            json!({"id": 1, "brand": "Acme", "model": "X1", "color": "black", "ram": "4GB", "rom": "64GB"})
        );
    }

    #[tokio::test]
    async fn should_ignore_client_supplied_id_on_create() {
        let app = app();

        let resp = send(&app, Method::POST, "/devices", Some(r#"{"id":77,"brand":"Acme"}"#)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(resp).await["id"], 1);
    }

    #[tokio::test]
    async fn should_accept_keys_in_any_case_on_create() {
        let app = app();

        let resp = send(&app, Method::POST, "/devices", Some(r#"{"Brand":"Acme","MODEL":"X1"}"#)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["brand"], "Acme");
        assert_eq!(body["model"], "X1");
    }

    #[tokio::test]
    async fn should_return_bad_request_with_decoder_message_on_malformed_create() {
        let app = app();

        let resp = send(&app, Method::POST, "/devices", Some(r#"{"brand":5}"#)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let message = String::from_utf8(body_bytes(resp).await).unwrap();
        assert!(message.contains("invalid type"), "unexpected message: {message}");

        let list = send(&app, Method::GET, "/devices", None).await;
        assert_eq!(body_json(list).await, json!([]));
    }

    #[tokio::test]
    async fn should_list_empty_collection_as_array() {
        let app = app();

        let resp = send(&app, Method::GET, "/devices", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!([]));
    }

    #[tokio::test]
    async fn should_list_devices_in_creation_order() {
        let app = app();
        send(&app, Method::POST, "/devices", Some(r#"{"model":"first"}"#)).await;
        send(&app, Method::POST, "/devices", Some(r#"{"model":"second"}"#)).await;

        let body = body_json(send(&app, Method::GET, "/devices", None).await).await;
        let models: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|d| (d["id"].as_u64().unwrap(), d["model"].as_str().unwrap().to_string()))
            .collect();
        assert_eq!(
            models,
            [(1, "first".to_string()), (2, "second".to_string())]
        );
    }

    #[tokio::test]
    async fn should_get_created_device() {
        let app = app();
        let created = body_json(send(&app, Method::POST, "/devices", Some(ACME_X1)).await).await;

        let resp = send(&app, Method::GET, "/devices/1", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, created);
    }

    #[tokio::test]
    async fn should_return_empty_not_found_for_missing_or_malformed_id() {
        let app = app();
        send(&app, Method::POST, "/devices", Some(ACME_X1)).await;

        for uri in ["/devices/2", "/devices/abc", "/devices/-1"] {
            let resp = send(&app, Method::GET, uri, None).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
            assert!(body_bytes(resp).await.is_empty(), "{uri}");
        }
    }

    #[tokio::test]
    async fn should_return_empty_not_found_for_invalid_utf8_id() {
        let app = app();
        send(&app, Method::POST, "/devices", Some(ACME_X1)).await;

        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let resp = send(&app, method.clone(), "/devices/%FF", Some(ACME_X1)).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method}");
            assert!(body_bytes(resp).await.is_empty(), "{method}");
        }

        let body = body_json(send(&app, Method::GET, "/devices", None).await).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_update_fields_but_keep_id() {
        let app = app();
        send(&app, Method::POST, "/devices", Some(ACME_X1)).await;

        let resp = send(
            &app,
            Method::PUT,
            "/devices/1",
            Some(r#"{"id":5,"brand":"Acme","model":"X2","color":"white","ram":"8GB","rom":"128GB"}"#),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            json!({"id": 1, "brand": "Acme", "model": "X2", "color": "white", "ram": "8GB", "rom": "128GB"})
        );

        let missing = send(&app, Method::GET, "/devices/5", None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_device() {
        let app = app();
        send(&app, Method::POST, "/devices", Some(ACME_X1)).await;

        let resp = send(&app, Method::PUT, "/devices/9", Some(ACME_X1)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(send(&app, Method::GET, "/devices", None).await).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["model"], "X1");
    }

    #[tokio::test]
    async fn should_prefer_not_found_over_bad_request_on_update() {
        let app = app();

        let resp = send(&app, Method::PUT, "/devices/1", Some("{not json")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_bad_request_and_keep_record_on_malformed_update() {
        let app = app();
        send(&app, Method::POST, "/devices", Some(ACME_X1)).await;

        let resp = send(&app, Method::PUT, "/devices/1", Some("{not json")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!body_bytes(resp).await.is_empty());

        let fetched = body_json(send(&app, Method::GET, "/devices/1", None).await).await;
        assert_eq!(fetched["model"], "X1");
    }

    #[tokio::test]
    async fn should_delete_device_and_preserve_order() {
        let app = app();
        for model in ["a", "b", "c"] {
            let body = format!(r#"{{"model":"{model}"}}"#);
            send(&app, Method::POST, "/devices", Some(body.as_str())).await;
        }

        let resp = send(&app, Method::DELETE, "/devices/2", None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(body_bytes(resp).await.is_empty());

        let body = body_json(send(&app, Method::GET, "/devices", None).await).await;
        let ids: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, [1, 3]);
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_device() {
        let app = app();
        send(&app, Method::POST, "/devices", Some(ACME_X1)).await;

        let resp = send(&app, Method::DELETE, "/devices/4", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(send(&app, Method::GET, "/devices", None).await).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }
}
