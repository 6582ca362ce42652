//! Domain layer of the Sparkify ETL: raw record and row types, the file
//! transforms, data-file discovery, and the [`sink::StarSchemaSink`] seam
//! the storage backend implements.

pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod sink;
pub mod transform;
