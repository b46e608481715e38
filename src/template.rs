use std::fs;
use std::path::Path;

use crate::context::ContextRef;
use crate::error::Error;
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::renderer::render;

/// A template compiled-on-demand from its source text.
///
/// The source is immutable after construction; every [Template::render]
/// call owns its private token and node buffers, so one template may be
/// rendered from independent call sites concurrently.
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Template {
            source: source.into(),
        }
    }

    /// The source text the template was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Runs the full pipeline against `context` and returns the
    /// substituted output.
    pub fn render(&self, context: ContextRef) -> Result<String, Error> {
        let tokens = tokenize(&self.source)?;
        let nodes = parse(&tokens)?;
        render(&nodes, context)
    }
}

/// Ahead-of-time loader that reads template files from disk.
pub struct Environment;

impl Environment {
    pub fn new() -> Self {
        Environment
    }

    /// Reads `path` as UTF-8 text and wraps it in a [Template]. An
    /// absent or unreadable file surfaces the I/O error.
    pub fn get_template(&self, path: impl AsRef<Path>) -> Result<Template, Error> {
        let source = fs::read_to_string(path)?;
        Ok(Template::new(source))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}
