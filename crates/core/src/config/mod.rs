//! Cartographer settings.
//!
//! The user block maps an origin (`WEBPACK`, ...) to bundle names, each with
//! optional overrides. Every bundle group is merged with its origin defaults
//! once, into an immutable [`SourceConfig`] that parsing reuses unchanged.

pub mod defaults;

use crate::error::{CartographerError, Result};
use crate::model::Origin;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Filename patterns excluded from a bundle.
///
/// Patterns only need to match at the start of the file name: `.+\.map`
/// drops `app.js.map`, while `map` alone drops nothing but names beginning
/// with `map`.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    patterns: Vec<(String, Regex)>,
}

impl IgnorePatterns {
    pub fn compile<S: AsRef<str>>(bundle: &str, patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(&format!("^(?:{p})"))
                    .map(|re| (p.to_string(), re))
                    .map_err(|source| CartographerError::InvalidIgnorePattern {
                        bundle: bundle.to_string(),
                        pattern: p.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_ignored(&self, filename: &str) -> bool {
        self.patterns.iter().any(|(_, re)| re.is_match(filename))
    }

    /// Patterns as written in the settings
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(p, _)| p.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl PartialEq for IgnorePatterns {
    fn eq(&self, other: &Self) -> bool {
        self.sources().eq(other.sources())
    }
}

/// Resolved settings of one bundle group.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub origin: Origin,
    /// Bundle (chunk) name this group registers
    pub name: String,
    /// Manifest path
    pub source: PathBuf,
    /// Directory prefix emitted files are served under
    pub bundles_dirname: String,
    /// File extension -> template identifier
    pub tag_templates: IndexMap<String, String>,
    pub ignore: IgnorePatterns,
}

impl SourceConfig {
    pub fn defaults(origin: Origin, name: &str) -> Result<Self> {
        Self::merge(origin, name, &BundleOverrides::default(), None)
    }

    /// Merge user overrides over the origin defaults.
    ///
    /// A relative `SOURCE` is resolved against `base_dir` when one is given.
    pub fn merge(
        origin: Origin,
        name: &str,
        overrides: &BundleOverrides,
        base_dir: Option<&Path>,
    ) -> Result<Self> {
        let defaults = defaults::for_origin(origin);

        let tag_templates = match &overrides.tag_templates {
            Some(templates) => templates.clone(),
            None => defaults
                .tag_templates
                .iter()
                .map(|(ext, tpl)| (ext.to_string(), tpl.to_string()))
                .collect(),
        };

        let bundles_dirname = overrides
            .bundles_dirname
            .clone()
            .unwrap_or_else(|| defaults.bundles_dirname.to_string());

        let mut source = overrides
            .source
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults.source));
        if let Some(base) = base_dir {
            if source.is_relative() {
                source = base.join(source);
            }
        }

        let ignore = match &overrides.ignore {
            Some(patterns) => IgnorePatterns::compile(name, patterns)?,
            None => IgnorePatterns::compile(name, defaults.ignore)?,
        };

        Ok(Self {
            origin,
            name: name.to_string(),
            source,
            bundles_dirname,
            tag_templates,
            ignore,
        })
    }

    /// Static-relative path of an emitted file.
    pub fn static_path(&self, filename: &str) -> String {
        if self.bundles_dirname.is_empty() || self.bundles_dirname.ends_with('/') {
            format!("{}{}", self.bundles_dirname, filename)
        } else {
            format!("{}/{}", self.bundles_dirname, filename)
        }
    }
}

/// Per-bundle settings as written by the user. Absent fields fall back to
/// the origin defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct BundleOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_templates: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundles_dirname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,
}

/// The whole configuration block: origin -> bundle name -> overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartographerConfig {
    groups: IndexMap<Origin, IndexMap<String, BundleOverrides>>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl CartographerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a JSON settings file. Relative manifest paths are resolved
    /// against the directory containing it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CartographerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&content)?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config.with_base_dir(base))
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_bundle(mut self, origin: Origin, name: &str, overrides: BundleOverrides) -> Self {
        self.groups
            .entry(origin)
            .or_default()
            .insert(name.to_string(), overrides);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(IndexMap::is_empty)
    }

    /// Merged settings of every configured bundle group, in declaration order.
    pub fn sources(&self) -> Result<Vec<Arc<SourceConfig>>> {
        let mut sources = Vec::new();
        for (origin, bundles) in &self.groups {
            for (name, overrides) in bundles {
                let merged =
                    SourceConfig::merge(*origin, name, overrides, self.base_dir.as_deref())?;
                sources.push(Arc::new(merged));
            }
        }
        Ok(sources)
    }

    /// Validate the settings without reading any manifest, reporting every
    /// problem found rather than stopping at the first.
    pub fn check(&self) -> Vec<CartographerError> {
        let mut problems = Vec::new();
        for (origin, bundles) in &self.groups {
            for (name, overrides) in bundles {
                if name.trim().is_empty() {
                    problems.push(CartographerError::Config(format!(
                        "{origin}: bundle name must not be empty"
                    )));
                }
                if let Some(source) = &overrides.source {
                    if source.as_os_str().is_empty() {
                        problems.push(CartographerError::Config(format!(
                            "{origin}.{name}: SOURCE must not be empty"
                        )));
                    }
                }
                if let Some(templates) = &overrides.tag_templates {
                    for (ext, template) in templates {
                        if ext.is_empty() || template.is_empty() {
                            problems.push(CartographerError::Config(format!(
                                "{origin}.{name}: TAG_TEMPLATES entries need an extension and a template"
                            )));
                        }
                    }
                }
                if let Err(e) =
                    SourceConfig::merge(*origin, name, overrides, self.base_dir.as_deref())
                {
                    problems.push(e);
                }
            }
        }
        problems
    }
}
