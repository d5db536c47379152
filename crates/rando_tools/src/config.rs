#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;

pub const ENV_CATALOG: &str = "RANDO_CATALOG";
pub const ENV_ASSET_MANIFEST: &str = "RANDO_ASSET_MANIFEST";
pub const ENV_SPRITES_DIR: &str = "RANDO_SPRITES_DIR";
pub const ENV_GENERATOR: &str = "RANDO_GENERATOR";

/// Where the launcher finds its inputs. Unset entries fall back to the
/// built-in catalog, no extra assets, and printing instead of generating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherConfig {
    pub catalog_path: Option<PathBuf>,
    pub asset_manifest: Option<PathBuf>,
    pub sprites_dir: Option<PathBuf>,
    pub generator: Option<PathBuf>,
}

impl LauncherConfig {
    pub fn default_local() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        };
        Self {
            catalog_path: path(ENV_CATALOG),
            asset_manifest: path(ENV_ASSET_MANIFEST),
            sprites_dir: path(ENV_SPRITES_DIR),
            generator: path(ENV_GENERATOR),
        }
    }

    /// Command-line values win over whatever the environment provided.
    pub fn with_overrides(
        mut self,
        catalog_path: Option<PathBuf>,
        asset_manifest: Option<PathBuf>,
        sprites_dir: Option<PathBuf>,
        generator: Option<PathBuf>,
    ) -> Self {
        if catalog_path.is_some() {
            self.catalog_path = catalog_path;
        }
        if asset_manifest.is_some() {
            self.asset_manifest = asset_manifest;
        }
        if sprites_dir.is_some() {
            self.sprites_dir = sprites_dir;
        }
        if generator.is_some() {
            self.generator = generator;
        }
        self
    }

    pub fn has_asset_sources(&self) -> bool {
        self.asset_manifest.is_some() || self.sprites_dir.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn at_config_01_reads_each_variable() {
        let cfg = LauncherConfig::from_lookup(lookup(&[
            (ENV_CATALOG, "catalog.json"),
            (ENV_ASSET_MANIFEST, "web/asset-manifest.json"),
            (ENV_SPRITES_DIR, "sprites"),
            (ENV_GENERATOR, "ladxr"),
        ]));
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(
            cfg.asset_manifest,
            Some(PathBuf::from("web/asset-manifest.json"))
        );
        assert_eq!(cfg.sprites_dir, Some(PathBuf::from("sprites")));
        assert_eq!(cfg.generator, Some(PathBuf::from("ladxr")));
        assert!(cfg.has_asset_sources());
    }

    #[test]
    fn at_config_02_blank_values_count_as_unset() {
        let cfg = LauncherConfig::from_lookup(lookup(&[(ENV_GENERATOR, "  ")]));
        assert_eq!(cfg, LauncherConfig::default());
        assert!(!cfg.has_asset_sources());
    }

    #[test]
    fn at_config_03_flags_override_environment() {
        let cfg = LauncherConfig::from_lookup(lookup(&[
            (ENV_GENERATOR, "from-env"),
            (ENV_SPRITES_DIR, "env-sprites"),
        ]))
        .with_overrides(None, None, None, Some(PathBuf::from("from-flag")));
        assert_eq!(cfg.generator, Some(PathBuf::from("from-flag")));
        assert_eq!(cfg.sprites_dir, Some(PathBuf::from("env-sprites")));
    }
}
