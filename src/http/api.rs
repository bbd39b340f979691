//! Typed calls for the verification-request and boundary endpoints.

use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::PattaResult;
use crate::http::client::{RequestOptions, SecureClient};
use crate::upload::boundary::{encode_boundary, LatLng, Ring};
use crate::upload::DocumentFile;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRequest {
    pub request_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub patta_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<serde_json::Value>,
    #[serde(default)]
    pub documents_count: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RequestList {
    pub requests: Vec<RequestSummary>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Boundary {
    pub patta_id: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
    #[serde(default)]
    pub validated: bool,
    #[serde(default)]
    pub area: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryUpdated {
    pub message: String,
    pub patta_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadedDocument {
    pub url: String,
    pub filename: String,
    pub message: String,
}

/// Patta endpoints on top of a [`SecureClient`].
#[derive(Clone)]
pub struct PattaApi {
    client: SecureClient,
}

impl PattaApi {
    pub fn new(client: SecureClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SecureClient {
        &self.client
    }

    /// Open a verification request for a patta at a location.
    pub async fn create_request(&self, patta_id: &str, location: LatLng) -> PattaResult<CreatedRequest> {
        location.check()?;
        let body = json!({
            "pattaId": patta_id,
            "location": { "lat": location.lat, "lng": location.lng },
        });
        self.client
            .request_json("/api/patta/requests", RequestOptions::post_json(body))
            .await
    }

    /// Verification requests visible to the current user.
    pub async fn list_requests(&self) -> PattaResult<RequestList> {
        self.client
            .request_json("/api/patta/requests", RequestOptions::get())
            .await
    }

    pub async fn boundary(&self, patta_id: &str) -> PattaResult<Boundary> {
        let url = self.boundary_url(patta_id)?;
        self.client
            .request_json(url.as_str(), RequestOptions::get())
            .await
    }

    /// Replace the stored boundary of a patta (staff only on the backend).
    pub async fn update_boundary(&self, patta_id: &str, rings: &[Ring], area: f64) -> PattaResult<BoundaryUpdated> {
        for point in rings.iter().flatten() {
            point.check()?;
        }
        let coordinates: serde_json::Value = serde_json::from_str(&encode_boundary(rings)?)?;
        let body = json!({ "coordinates": coordinates, "area": area });
        let url = self.boundary_url(patta_id)?;
        self.client
            .request_json(url.as_str(), RequestOptions::post_json(body))
            .await
    }

    /// `/api/patta/boundaries/{pattaId}` with the id escaped as one path segment.
    fn boundary_url(&self, patta_id: &str) -> PattaResult<url::Url> {
        let mut url = self.client.resolve("/api/patta/boundaries/")?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(patta_id);
        }
        Ok(url)
    }

    /// Upload one supporting document outside of a full application.
    pub async fn upload_document(&self, document: DocumentFile) -> PattaResult<UploadedDocument> {
        let form = Form::new().part("document", document.into_part()?);
        self.client
            .request_json("/api/patta/documents/upload", RequestOptions::post_multipart(form))
            .await
    }
}
