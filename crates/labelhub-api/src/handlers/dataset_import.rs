use crate::auth::CurrentPrincipal;
use crate::error::{multipart_error, ErrorResponse, HttpAppError};
use crate::services::ImportRequest;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use labelhub_core::models::{DatasetImportRequest, DatasetImportResponse};
use labelhub_core::AppError;
use labelhub_processing::UploadedFile;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Fields of the import form
struct ImportForm {
    file: Option<UploadedFile>,
    fields: DatasetImportRequest,
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/datasets/import",
    tag = "datasets",
    params(
        ("project_id" = Uuid, Path, description = "Project receiving the dataset")
    ),
    request_body(
        content = inline(Object),
        content_type = "multipart/form-data",
        description = "`file` (image, text file, zip or rar archive), optional `name` and `description`"
    ),
    responses(
        (status = 200, description = "Dataset imported", body = DatasetImportResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not a member of the project", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Storage provider rejected an upload", body = ErrorResponse),
        (status = 504, description = "Import timed out", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn import_dataset(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    CurrentPrincipal(principal): CurrentPrincipal,
    multipart: Multipart,
) -> Result<Json<DatasetImportResponse>, HttpAppError> {
    let form = read_import_form(multipart, state.config.max_upload_size_bytes()).await?;
    form.fields.validate().map_err(AppError::from)?;

    let response = state
        .imports
        .import(
            principal.as_ref(),
            ImportRequest {
                project_id,
                file: form.file,
                name: form.fields.name,
                description: form.fields.description,
            },
        )
        .await?;

    Ok(Json(response))
}

/// Collect the `file`, `name` and `description` fields. Unknown fields are ignored.
async fn read_import_form(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<ImportForm, AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut fields = DatasetImportRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(multipart_error)?;

                if data.len() > max_size {
                    return Err(AppError::PayloadTooLarge(format!(
                        "File size exceeds maximum allowed size of {} MB",
                        max_size / 1024 / 1024
                    )));
                }
                file = Some(UploadedFile::new(filename, content_type, data));
            }
            "name" => fields.name = Some(field.text().await.map_err(multipart_error)?),
            "description" => {
                fields.description = Some(field.text().await.map_err(multipart_error)?)
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(ImportForm { file, fields })
}
