// src/core/resolver.rs
use crate::config::SessionConfig;
use crate::core::alphabet::Alphabet;
use crate::core::types::{AssetRef, GlyphCell};
use crate::error::AssetError;
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

/// Locates sign images and checks whether they can be used.
pub trait AssetProvider: Send + Sync {
    fn locate(&self, alphabet: Alphabet, key: &str) -> AssetRef;

    /// Settles once: `Ok` if the asset is usable, `Err` otherwise.
    fn probe(&self, asset: &AssetRef) -> impl Future<Output = Result<(), AssetError>> + Send;
}

/// Sign images stored on disk as `<root>/<alphabet dir>/<KEY>.<ext>`.
#[derive(Debug, Clone)]
pub struct FsAssetProvider {
    root: PathBuf,
    extension: String,
}

impl FsAssetProvider {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.asset_root.clone(), config.asset_extension.clone())
    }
}

/// Keys come straight from user input, so anything that could leave the
/// alphabet directory is refused.
fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && !key.chars().any(|c| c == '/' || c == '\\' || c == '\0')
}

impl AssetProvider for FsAssetProvider {
    fn locate(&self, alphabet: Alphabet, key: &str) -> AssetRef {
        let mut location = self.root.join(alphabet.dir_name());
        location.push(format!("{key}.{}", self.extension));
        AssetRef {
            alphabet,
            key: key.to_string(),
            location,
        }
    }

    async fn probe(&self, asset: &AssetRef) -> Result<(), AssetError> {
        if !is_safe_key(&asset.key) {
            return Err(AssetError::InvalidKey(asset.key.clone()));
        }
        match tokio::fs::metadata(&asset.location).await {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(AssetError::Missing(asset.location.clone())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AssetError::Missing(asset.location.clone()))
            }
            Err(source) => Err(AssetError::Io {
                path: asset.location.clone(),
                source,
            }),
        }
    }
}

/// Resolves one character of a word into a settled cell.
///
/// The probe is the only suspension point. Any probe failure, including
/// running past `timeout`, settles the cell as a text fallback; this
/// function itself cannot fail.
pub async fn resolve_cell<P: AssetProvider>(
    provider: &P,
    source: char,
    alphabet: Alphabet,
    position: usize,
    word_len: usize,
    timeout: Duration,
) -> GlyphCell {
    let display = alphabet.display_form(source);
    let key = alphabet.asset_key(source);
    let asset = provider.locate(alphabet, &key);
    let mut cell = GlyphCell::pending(source, display, asset, position, word_len);

    let probed = match tokio::time::timeout(timeout, provider.probe(cell.asset())).await {
        Ok(result) => result,
        Err(_) => Err(AssetError::TimedOut {
            path: cell.asset().location.clone(),
            after: timeout,
        }),
    };

    match probed {
        Ok(()) => {
            cell.settle(true);
            log::debug!("Cell {position} {:?} -> {}", source, cell.asset().location.display());
        }
        Err(e @ AssetError::Missing(_)) | Err(e @ AssetError::InvalidKey(_)) => {
            cell.settle(false);
            log::debug!("Cell {position} {:?} falls back to text: {e}", source);
        }
        Err(e) => {
            cell.settle(false);
            log::warn!("Cell {position} {:?} falls back to text: {e}", source);
        }
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CellOutcome, FormatTag};
    use std::fs;
    use tempfile::TempDir;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn asset_tree(files: &[&str]) -> (TempDir, FsAssetProvider) {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"\x89PNG").unwrap();
        }
        let provider = FsAssetProvider::new(dir.path(), "png");
        (dir, provider)
    }

    #[test]
    fn locate_uses_alphabet_directory() {
        let provider = FsAssetProvider::new("images", ".png");
        let asset = provider.locate(Alphabet::Arabic, "BA");
        assert_eq!(asset.location, PathBuf::from("images/ar/BA.png"));
        assert_eq!(asset.key, "BA");
    }

    #[test]
    fn unsafe_keys_are_detected() {
        assert!(is_safe_key("A"));
        assert!(is_safe_key("ALEF_MADDA"));
        assert!(!is_safe_key("/"));
        assert!(!is_safe_key(".."));
        assert!(!is_safe_key("\\"));
    }

    #[tokio::test]
    async fn existing_asset_resolves() {
        let (_dir, provider) = asset_tree(&["en/H.png"]);
        let cell = resolve_cell(&provider, 'h', Alphabet::Latin, 0, 2, TIMEOUT).await;
        assert_eq!(cell.outcome(), CellOutcome::ResolvedAsset);
        assert_eq!(cell.format(), Some(FormatTag::Png));
        assert_eq!(cell.display(), "H");
        assert_eq!(cell.asset_key(), "H");
    }

    #[tokio::test]
    async fn missing_asset_falls_back() {
        let (_dir, provider) = asset_tree(&["en/H.png"]);
        let cell = resolve_cell(&provider, 'q', Alphabet::Latin, 1, 2, TIMEOUT).await;
        assert_eq!(cell.outcome(), CellOutcome::FallbackText);
        assert_eq!(cell.format(), Some(FormatTag::Text));
        assert_eq!(cell.display(), "Q");
    }

    #[tokio::test]
    async fn directory_is_not_an_asset() {
        let (dir, provider) = asset_tree(&[]);
        fs::create_dir_all(dir.path().join("en/X.png")).unwrap();
        let cell = resolve_cell(&provider, 'x', Alphabet::Latin, 0, 1, TIMEOUT).await;
        assert_eq!(cell.outcome(), CellOutcome::FallbackText);
    }

    #[tokio::test]
    async fn path_like_characters_fall_back() {
        let (_dir, provider) = asset_tree(&[]);
        let cell = resolve_cell(&provider, '/', Alphabet::Latin, 0, 1, TIMEOUT).await;
        assert_eq!(cell.outcome(), CellOutcome::FallbackText);
        assert_eq!(cell.display(), "/");
    }

    #[tokio::test]
    async fn arabic_cell_keeps_source_letter() {
        let (_dir, provider) = asset_tree(&["ar/BA.png"]);
        let cell = resolve_cell(&provider, 'ب', Alphabet::Arabic, 0, 1, TIMEOUT).await;
        assert_eq!(cell.outcome(), CellOutcome::ResolvedAsset);
        assert_eq!(cell.display(), "ب");
        assert_eq!(cell.asset_key(), "BA");
    }

    struct NeverSettles;

    impl AssetProvider for NeverSettles {
        fn locate(&self, alphabet: Alphabet, key: &str) -> AssetRef {
            AssetRef {
                alphabet,
                key: key.to_string(),
                location: PathBuf::from(key),
            }
        }

        async fn probe(&self, _asset: &AssetRef) -> Result<(), AssetError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_probe_times_out_to_fallback() {
        let cell = resolve_cell(&NeverSettles, 'a', Alphabet::Latin, 0, 1, TIMEOUT).await;
        assert_eq!(cell.outcome(), CellOutcome::FallbackText);
        assert_eq!(cell.display(), "A");
    }
}
