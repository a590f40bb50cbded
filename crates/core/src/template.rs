//! Default tag renderer backed by `minijinja`.

use crate::config::defaults::{JAVASCRIPT_TAG_TEMPLATE, STYLESHEET_TAG_TEMPLATE};
use cartographer_api::{BoxError, CollaboratorError, TagContext, TemplateRenderer};
use minijinja::{AutoEscape, Environment, ErrorKind};
use std::path::PathBuf;

const JAVASCRIPT_TAG: &str = r#"<script type="text/javascript" src="{{ ASSET_URL }}"></script>"#;
const STYLESHEET_TAG: &str = r#"<link type="text/css" href="{{ ASSET_URL }}" rel="stylesheet">"#;

fn builtin_template(name: &str) -> Option<&'static str> {
    match name {
        JAVASCRIPT_TAG_TEMPLATE => Some(JAVASCRIPT_TAG),
        STYLESHEET_TAG_TEMPLATE => Some(STYLESHEET_TAG),
        _ => None,
    }
}

/// Renders tag templates by identifier.
///
/// Identifiers are looked up in the template directory first (if any), then
/// among the built-in `cartographer/*_tag.html` templates.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_template_dir(dir: impl Into<PathBuf>) -> Self {
        Self::build(Some(dir.into()))
    }

    fn build(dir: Option<PathBuf>) -> Self {
        let mut env = Environment::new();
        // Asset URLs come from the static resolver, not from user input
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let dir_loader = dir.map(minijinja::path_loader);
        env.set_loader(move |name| {
            if let Some(load) = &dir_loader {
                if let Some(source) = load(name)? {
                    return Ok(Some(source));
                }
            }
            Ok(builtin_template(name).map(str::to_string))
        });
        Self { env }
    }

    /// Register an in-memory template, shadowing the directory and built-ins.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), minijinja::Error> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &TagContext) -> Result<String, BoxError> {
        let tmpl = self.env.get_template(template).map_err(|e| -> BoxError {
            if e.kind() == ErrorKind::TemplateNotFound {
                Box::new(CollaboratorError::TemplateNotFound(template.to_string()))
            } else {
                Box::new(e)
            }
        })?;
        Ok(tmpl.render(context)?)
    }
}
