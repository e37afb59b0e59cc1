//! TOML asset loading.

use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Deserialize;

use super::Loader;

/// TOML asset loader.
#[non_exhaustive]
pub struct TomlLoader;

impl<T> Loader<T> for TomlLoader
where
    T: for<'de> Deserialize<'de>,
{
    #[inline]
    fn load(bytes: &[u8], id: &str) -> Result<T> {
        // Convert raw bytes to a valid UTF-8 string
        let string = std::str::from_utf8(bytes)
            .into_diagnostic()
            .wrap_err_with(|| format!("Error parsing '{id}' due to invalid UTF-8 bytes"))?;

        toml::from_str::<T>(string)
            .into_diagnostic()
            .wrap_err_with(|| format!("Error parsing TOML of '{id}'"))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::{Loader, TomlLoader};

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Entry {
        name: String,
        amount: u8,
    }

    #[test]
    fn load_struct() {
        let entry: Entry = TomlLoader::load(b"name = \"hero\"\namount = 3", "entry").unwrap();

        assert_eq!(
            entry,
            Entry {
                name: "hero".to_owned(),
                amount: 3
            }
        );
    }

    #[test]
    fn invalid_utf8() {
        let result: miette::Result<Entry> = TomlLoader::load(&[0xFF, 0xFE], "entry");

        assert!(result.is_err());
    }
}
