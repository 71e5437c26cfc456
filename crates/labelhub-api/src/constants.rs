//! API constants

/// Versioned prefix of every dataset route
pub const API_PREFIX: &str = "/api/v1";

/// Path of the generated OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";
