//! Document HTTP handlers.
//!
//! ```text
//! GET    /api/v1/documents
//! POST   /api/v1/documents?title=Spring%20catalogue   (raw PDF body)
//! POST   /api/v1/documents/{id}/lock
//! POST   /api/v1/documents/{id}/unlock
//! PUT    /api/v1/documents/{id}/visibility {"isPublic":true}
//! DELETE /api/v1/documents/{id}
//! GET    /api/v1/public/documents/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ReconciliationOutcome;
use crate::domain::ports::{
    DocumentMutationResponse, DocumentView, PublicDocumentView, UploadDocumentRequest,
    require_owner,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_document_id};

/// Query string for uploads.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Display title for the new document.
    pub title: Option<String>,
}

/// Request body for visibility changes.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRequest {
    /// Whether the public link is enabled.
    pub is_public: Option<bool>,
}

/// Response body for deletions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDocumentResponse {
    /// Lock transitions applied after the slot was freed.
    pub reconciliation: ReconciliationOutcome,
}

/// List the caller's documents, oldest first.
#[get("/documents")]
pub async fn list_documents(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DocumentView>>> {
    let owner_id = require_owner(&session)?;
    let documents = state.documents_query.list_documents(&owner_id).await?;
    Ok(web::Json(documents))
}

/// Upload a PDF. The body is the raw file; the title travels in the query.
#[post("/documents")]
pub async fn upload_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let owner_id = require_owner(&session)?;
    let title = query
        .into_inner()
        .title
        .ok_or_else(|| missing_field_error("title"))?;

    let document = state
        .documents
        .upload_document(UploadDocumentRequest {
            owner_id,
            title,
            bytes: body.to_vec(),
        })
        .await?;
    Ok(HttpResponse::Created().json(document))
}

/// Lock a document on the owner's request.
#[post("/documents/{id}/lock")]
pub async fn lock_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DocumentMutationResponse>> {
    let owner_id = require_owner(&session)?;
    let id = parse_document_id(&path)?;
    let response = state.documents.lock_document(&owner_id, id).await?;
    Ok(web::Json(response))
}

/// Clear a manual lock. Size and plan locks answer `409 Conflict`.
#[post("/documents/{id}/unlock")]
pub async fn unlock_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DocumentMutationResponse>> {
    let owner_id = require_owner(&session)?;
    let id = parse_document_id(&path)?;
    let response = state.documents.unlock_document(&owner_id, id).await?;
    Ok(web::Json(response))
}

/// Enable or disable the public link.
#[put("/documents/{id}/visibility")]
pub async fn set_visibility(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<VisibilityRequest>,
) -> ApiResult<web::Json<DocumentMutationResponse>> {
    let owner_id = require_owner(&session)?;
    let id = parse_document_id(&path)?;
    let is_public = payload
        .into_inner()
        .is_public
        .ok_or_else(|| missing_field_error("isPublic"))?;
    let response = state
        .documents
        .set_visibility(&owner_id, id, is_public)
        .await?;
    Ok(web::Json(response))
}

/// Delete a document and its stored bytes.
#[delete("/documents/{id}")]
pub async fn delete_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteDocumentResponse>> {
    let owner_id = require_owner(&session)?;
    let id = parse_document_id(&path)?;
    let reconciliation = state.documents.delete_document(&owner_id, id).await?;
    Ok(web::Json(DeleteDocumentResponse { reconciliation }))
}

/// Open a shared document anonymously and count the view.
#[get("/public/documents/{id}")]
pub async fn open_public_document(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path)?;
    let view: PublicDocumentView = state.documents_query.open_public_document(id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(view))
}

#[cfg(test)]
#[path = "documents_tests.rs"]
mod tests;
