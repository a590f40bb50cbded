/// Static-file URL resolution.
///
/// Given a path relative to the static root (for example
/// `webpack_bundles/main-3f2a.js`), returns the public URL clients should
/// load it from.
pub trait StaticUrlResolver: Send + Sync {
    fn url(&self, relative_path: &str) -> Result<String, crate::BoxError>;
}
