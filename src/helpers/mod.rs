//! URL helpers shared by the loader, the resolver and the templates

mod url;

pub use url::*;
