//! Asset tag rendering for the presentation layer.

use crate::error::{CartographerError, Result};
use crate::model::{Asset, Bundle};
use crate::registry::Registry;
use cartographer_api::{TagContext, TemplateRenderer};
use std::sync::Arc;

/// Renders the tags of a registered bundle.
///
/// Read-only: works on an `Arc<Bundle>` snapshot, so a refresh running at
/// the same time is either fully visible or not at all.
#[derive(Clone)]
pub struct TagResolver {
    registry: Arc<Registry>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl TagResolver {
    pub fn new(registry: Arc<Registry>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { registry, renderer }
    }

    /// Render every asset of `bundle_name` whose name ends with one of
    /// `kinds` (all assets when `None`), joined with newlines.
    pub fn render_bundle<S: AsRef<str>>(
        &self,
        bundle_name: &str,
        kinds: Option<&[S]>,
    ) -> Result<String> {
        let bundle = self.registry.bundle(bundle_name)?;
        let kinds = kinds.unwrap_or(&[]);

        let tags = bundle
            .filter_assets(kinds)
            .map(|asset| self.render_asset(&bundle, asset))
            .collect::<Result<Vec<_>>>()?;
        Ok(tags.join("\n"))
    }

    /// Template configured for the asset's file extension
    pub fn template_for<'b>(&self, bundle: &'b Bundle, asset: &Asset) -> Result<&'b str> {
        let extension = asset.extension().unwrap_or_default();
        bundle
            .tag_template(extension)
            .ok_or_else(|| CartographerError::MissingTemplate {
                bundle: bundle.name().to_string(),
                extension: extension.to_string(),
            })
    }

    fn render_asset(&self, bundle: &Bundle, asset: &Asset) -> Result<String> {
        let template = self.template_for(bundle, asset)?;
        self.renderer
            .render(template, &TagContext::new(asset.url.as_str()))
            .map_err(CartographerError::Render)
    }
}

/// Split a comma-separated kind argument (`"js, css"`) into suffixes.
pub fn split_kinds(kind: &str) -> Vec<String> {
    kind.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
