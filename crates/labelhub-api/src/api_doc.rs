//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use labelhub_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LabelHub Dataset Import API",
        version = "0.1.0",
        description = "Imports images, text files and zip/rar archives as datasets of labeling work items."
    ),
    paths(handlers::dataset_import::import_dataset),
    components(schemas(
        models::DatasetImportRequest,
        models::DatasetImportResponse,
        error::ErrorResponse
    )),
    modifiers(&SecurityAddon),
    tags((name = "datasets", description = "Dataset import"))
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
