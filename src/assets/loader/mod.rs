//! Asset loader helper.

pub mod png;
pub mod toml;

use miette::Result;

/// How an asset should be loaded.
pub trait Loader<T> {
    /// Load an asset from raw bytes.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw contents of the asset file.
    /// * `id` - Name of the asset, only used for error reporting.
    ///
    /// # Errors
    ///
    /// - When the bytes can't be parsed into the asset.
    fn load(bytes: &[u8], id: &str) -> Result<T>;
}
