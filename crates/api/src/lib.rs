//! Collaborator interfaces consumed by the cartographer core.
//!
//! The core never renders templates or resolves static URLs by itself: it
//! selects *which* template and *what* context, and hands the work to the
//! implementations registered here.

pub mod error;
pub mod static_files;
pub mod template;

pub use error::{BoxError, CollaboratorError};
pub use static_files::StaticUrlResolver;
pub use template::{TagContext, TemplateRenderer};
