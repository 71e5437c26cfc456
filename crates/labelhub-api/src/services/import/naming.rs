use labelhub_core::constants::{
    DEFAULT_DATASET_NAME_SUFFIX, FALLBACK_DATASET_STEM, MAX_DATASET_NAME_LENGTH,
};
use labelhub_core::AppError;
use labelhub_processing::upload::classify;

/// Dataset name for an import: the caller's name, kept as given, when it is not
/// blank, otherwise `{file stem}-import`.
///
/// The name becomes a storage path segment, so separators and `..` are refused.
pub fn resolve_dataset_name(given: Option<&str>, filename: &str) -> Result<String, AppError> {
    let name = match given.filter(|name| !name.trim().is_empty()) {
        Some(name) => name.to_string(),
        None => {
            let stem = classify::stem(filename);
            let stem = if stem.trim().is_empty() {
                FALLBACK_DATASET_STEM
            } else {
                stem
            };
            format!("{}{}", stem, DEFAULT_DATASET_NAME_SUFFIX)
        }
    };

    if name.contains('/') || name.contains('\\') || name == ".." || name == "." {
        return Err(AppError::InvalidInput(
            "Dataset name must not contain path separators".to_string(),
        ));
    }
    if name.chars().count() > MAX_DATASET_NAME_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Dataset name must be at most {} characters",
            MAX_DATASET_NAME_LENGTH
        )));
    }

    Ok(name)
}
