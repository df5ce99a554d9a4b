use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentRole, state::AppState},
    domain::{Material, MaterialType, ModuleFilter, NewMaterial},
    error::{AppError, Result},
    service::{ListView, Posted, UploadedFile},
};

#[derive(Debug, Deserialize)]
pub struct ListMaterialsQuery {
    pub module: Option<String>,
    pub q: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentRole(role)): Extension<CurrentRole>,
    Query(params): Query<ListMaterialsQuery>,
) -> Result<Json<ListView<Material>>> {
    let filter = ModuleFilter::parse(params.module.as_deref());
    let query = params.q.unwrap_or_default();

    let view = state
        .service_context
        .content_service
        .materials(role, &filter, &query)
        .await?;

    Ok(Json(view))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<NewMaterial>,
) -> Result<(StatusCode, Json<Posted<Material>>)> {
    let posted = state.service_context.content_service.add_material(request, None).await?;
    Ok((StatusCode::CREATED, Json(posted)))
}

/// Multipart form with `title`, `desc`, `url`, `type`, `module` and an
/// optional `file` part.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Posted<Material>>)> {
    let mut title = String::new();
    let mut desc = String::new();
    let mut url = String::new();
    let mut material_type = MaterialType::default();
    let mut module = String::new();
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
            // Browsers send an empty part when no file was picked
            if !file_name.is_empty() && !bytes.is_empty() {
                file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;

        match name.as_str() {
            "title" => title = value,
            "desc" => desc = value,
            "url" => url = value,
            "type" => {
                material_type = MaterialType::parse(&value).ok_or_else(|| {
                    AppError::Validation(format!("Unknown material type: {}", value))
                })?
            }
            "module" => module = value,
            _ => {}
        }
    }

    let request = NewMaterial {
        title,
        desc,
        url,
        material_type,
        module,
    };

    let posted = state.service_context.content_service.add_material(request, file).await?;
    Ok((StatusCode::CREATED, Json(posted)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.content_service.delete_material(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
