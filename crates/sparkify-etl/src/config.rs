/// Re-export `Config` from `sparkify-core` for use within this crate.
///
/// The settings live in `sparkify-core` so integration tests and the storage
/// crate share one definition without depending on the binaries.
pub use sparkify_core::config::Config;
