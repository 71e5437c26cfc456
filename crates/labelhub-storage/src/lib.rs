//! LabelHub Storage Library
//!
//! Storage abstraction for imported dataset files with Supabase Storage, S3 and
//! local filesystem backends.
//!
//! # Path format
//!
//! Every backend receives the same relative keys, built by [`paths`]:
//! `project-{project_id}/{dataset_name}/{random_id}/{filename}`. Keys must not contain
//! `..` segments or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod paths;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(feature = "storage-supabase")]
pub mod supabase;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use labelhub_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
#[cfg(feature = "storage-supabase")]
pub use supabase::SupabaseStorage;
pub use traits::{Storage, StorageError, StorageResult};
