pub mod dataset_import;
