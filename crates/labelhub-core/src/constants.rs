//! Constants shared by the import pipeline and its collaborators.

/// Roles that may import into any project without being a member.
pub const PRIVILEGED_ROLES: &[&str] = &["admin", "manager"];

/// Version assigned to every freshly imported dataset.
pub const INITIAL_DATASET_VERSION: i32 = 1;

/// Suffix appended to the file stem when the caller does not name the dataset.
pub const DEFAULT_DATASET_NAME_SUFFIX: &str = "-import";

/// Stem used when the uploaded filename has none (e.g. `.zip`).
pub const FALLBACK_DATASET_STEM: &str = "dataset";

/// Upper bound for dataset names, including generated ones.
pub const MAX_DATASET_NAME_LENGTH: usize = 255;
