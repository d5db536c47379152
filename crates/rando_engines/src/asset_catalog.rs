#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rando_contracts::{ChoiceEntry, OptionSchema, SchemaError};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

const ASSET_EXTENSION: &str = ".bin";
const COLLISION_MARKER: char = '*';

#[derive(Debug, Error)]
pub enum AssetCatalogError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset manifest {path} is malformed: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("asset manifest entry '{entry}' is not a graphics asset path")]
    UnrecognizedEntry { entry: String },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// One selectable asset: display name and the file passed to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub name: String,
    pub path: PathBuf,
}

impl AssetEntry {
    pub fn to_choice(&self) -> ChoiceEntry {
        ChoiceEntry::new(self.name.clone(), self.path.to_string_lossy())
    }
}

pub trait AssetCatalogProvider {
    /// Assets shipped with the generator, in manifest order.
    fn builtin_assets(&self) -> Result<Vec<AssetEntry>, AssetCatalogError>;
    /// User-supplied assets, in a stable order.
    fn custom_assets(&self) -> Result<Vec<AssetEntry>, AssetCatalogError>;
}

/// Built-ins from a web build's `asset-manifest.json`, customs from a directory of `.bin` files.
#[derive(Debug, Clone)]
pub struct ManifestAssetProvider {
    manifest_path: Option<PathBuf>,
    custom_dir: Option<PathBuf>,
}

impl ManifestAssetProvider {
    pub fn new(manifest_path: Option<PathBuf>, custom_dir: Option<PathBuf>) -> Self {
        Self {
            manifest_path,
            custom_dir,
        }
    }
}

impl AssetCatalogProvider for ManifestAssetProvider {
    fn builtin_assets(&self) -> Result<Vec<AssetEntry>, AssetCatalogError> {
        match &self.manifest_path {
            Some(path) => load_manifest(path),
            None => Ok(Vec::new()),
        }
    }

    fn custom_assets(&self) -> Result<Vec<AssetEntry>, AssetCatalogError> {
        match &self.custom_dir {
            Some(dir) => scan_directory(dir),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssetManifest {
    files: serde_json::Map<String, serde_json::Value>,
}

fn manifest_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\./static/media/Graphics(\w+)\.[a-f0-9]{8}\.bin$")
            .expect("manifest pattern must compile")
    })
}

fn custom_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\w+)").expect("custom name pattern must compile"))
}

/// Reads the built-in graphics from a manifest. Paths are resolved against the
/// manifest's own directory. A `.bin` entry that does not look like a bundled
/// graphics file makes the whole manifest invalid.
pub fn load_manifest(path: &Path) -> Result<Vec<AssetEntry>, AssetCatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| AssetCatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest: AssetManifest =
        serde_json::from_str(&raw).map_err(|source| AssetCatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    let mut out = Vec::new();
    for file in manifest.files.values().filter_map(serde_json::Value::as_str) {
        if !file.ends_with(ASSET_EXTENSION) {
            continue;
        }
        let name = manifest_pattern()
            .captures(file)
            .and_then(|c| c.get(1))
            .ok_or_else(|| AssetCatalogError::UnrecognizedEntry {
                entry: file.to_string(),
            })?
            .as_str()
            .to_string();
        let relative = file.trim_start_matches("./");
        let path = relative
            .split('/')
            .fold(base.to_path_buf(), |acc, part| acc.join(part));
        out.push(AssetEntry { name, path });
    }
    info!(manifest = %path.display(), count = out.len(), "loaded built-in assets");
    Ok(out)
}

/// Lists `.bin` files in `dir` by file name. A missing directory has no assets.
pub fn scan_directory(dir: &Path) -> Result<Vec<AssetEntry>, AssetCatalogError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let io_err = |source| AssetCatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let file_name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                if Path::new(&raw).extension().is_some_and(|ext| ext == "bin") {
                    warn!(file = ?raw, "skipping asset with a non-UTF-8 file name");
                }
                continue;
            }
        };
        if file_name.ends_with(ASSET_EXTENSION) && entry.path().is_file() {
            files.push(file_name);
        }
    }
    files.sort();

    let mut out = Vec::new();
    for file_name in files {
        let Some(name) = custom_name_pattern()
            .captures(&file_name)
            .and_then(|c| c.get(1))
        else {
            warn!(file = %file_name, "skipping asset without a usable name");
            continue;
        };
        out.push(AssetEntry {
            name: name.as_str().to_string(),
            path: dir.join(&file_name),
        });
    }
    Ok(out)
}

/// Appends the collision marker to any name already taken by `existing` or by
/// an earlier entry in `entries`.
pub fn disambiguate<'a, I>(existing: I, entries: Vec<AssetEntry>) -> Vec<AssetEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut taken: BTreeSet<String> = existing.into_iter().map(str::to_string).collect();
    entries
        .into_iter()
        .map(|mut entry| {
            if taken.contains(&entry.name) {
                let original = entry.name.clone();
                while taken.contains(&entry.name) {
                    entry.name.push(COLLISION_MARKER);
                }
                warn!(from = %original, to = %entry.name, "renamed colliding asset");
            }
            taken.insert(entry.name.clone());
            entry
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetAugmentReport {
    /// Choices after the built-ins were appended, before custom assets.
    pub builtin_count: usize,
    pub custom_count: usize,
}

/// Extends the asset-choice option `key` with the provider's built-ins, then its customs.
pub fn augment_from_provider<P>(
    schema: &mut OptionSchema,
    key: &str,
    provider: &P,
) -> Result<AssetAugmentReport, AssetCatalogError>
where
    P: AssetCatalogProvider + ?Sized,
{
    let builtin = provider.builtin_assets()?;
    let builtin = disambiguate(existing_labels(schema, key)?, builtin);
    let first = schema.augment(key, builtin.iter().map(AssetEntry::to_choice).collect())?;

    let custom = provider.custom_assets()?;
    let custom = disambiguate(existing_labels(schema, key)?, custom);
    let second = schema.augment(key, custom.iter().map(AssetEntry::to_choice).collect())?;

    Ok(AssetAugmentReport {
        builtin_count: first.base_count + first.appended,
        custom_count: second.appended,
    })
}

fn existing_labels<'a>(schema: &'a OptionSchema, key: &str) -> Result<Vec<&'a str>, SchemaError> {
    let option = schema.get(key).ok_or_else(|| SchemaError::UnknownOption {
        key: key.to_string(),
    })?;
    let choices = option
        .kind
        .choices()
        .ok_or_else(|| SchemaError::NotAssetChoice {
            key: key.to_string(),
        })?;
    Ok(choices.iter().map(|c| c.label.as_str()).collect())
}
