//! Per-origin default settings, applied field by field under user overrides.

use crate::model::Origin;

pub const JAVASCRIPT_TAG_TEMPLATE: &str = "cartographer/javascript_tag.html";
pub const STYLESHEET_TAG_TEMPLATE: &str = "cartographer/stylesheet_tag.html";

pub struct OriginDefaults {
    pub tag_templates: &'static [(&'static str, &'static str)],
    pub bundles_dirname: &'static str,
    pub source: &'static str,
    pub ignore: &'static [&'static str],
}

const TAG_TEMPLATES: &[(&str, &str)] = &[
    ("js", JAVASCRIPT_TAG_TEMPLATE),
    ("css", STYLESHEET_TAG_TEMPLATE),
];

pub fn for_origin(origin: Origin) -> OriginDefaults {
    match origin {
        Origin::Webpack => OriginDefaults {
            tag_templates: TAG_TEMPLATES,
            bundles_dirname: "webpack_bundles/",
            source: "webpack-stats.json",
            ignore: &[r".+\.hot-update.js", r".+\.map"],
        },
        Origin::Directory => OriginDefaults {
            tag_templates: TAG_TEMPLATES,
            bundles_dirname: "",
            source: ".",
            ignore: &[],
        },
    }
}
