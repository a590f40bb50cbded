use serde::Serialize;

/// Context handed to a tag template.
///
/// A tag template receives exactly one value: the public URL of the asset,
/// exposed to the template as `ASSET_URL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagContext {
    #[serde(rename = "ASSET_URL")]
    pub asset_url: String,
}

impl TagContext {
    pub fn new(asset_url: impl Into<String>) -> Self {
        Self {
            asset_url: asset_url.into(),
        }
    }
}

/// Template rendering engine.
pub trait TemplateRenderer: Send + Sync {
    /// Render the template identified by `template` with `context`.
    fn render(&self, template: &str, context: &TagContext) -> Result<String, crate::BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_exposes_asset_url() {
        let ctx = TagContext::new("/static/main.js");
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value, serde_json::json!({ "ASSET_URL": "/static/main.js" }));
    }
}
