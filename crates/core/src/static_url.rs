use cartographer_api::{BoxError, CollaboratorError, StaticUrlResolver};

/// Joins static-relative paths onto a fixed public prefix, like a
/// `STATIC_URL` setting (`/static/`, `https://cdn.example.com/assets/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixUrlResolver {
    prefix: String,
}

impl PrefixUrlResolver {
    pub const DEFAULT_PREFIX: &'static str = "/static/";

    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for PrefixUrlResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

impl StaticUrlResolver for PrefixUrlResolver {
    fn url(&self, relative_path: &str) -> Result<String, BoxError> {
        if relative_path.starts_with('/') || relative_path.split('/').any(|part| part == "..") {
            return Err(Box::new(CollaboratorError::InvalidPath(
                relative_path.to_string(),
            )));
        }
        Ok(format!("{}{}", self.prefix, relative_path))
    }
}
