//! A minimal `{{ }}` / `{% %}` text-templating engine.
//!
//! A [Template] holds its source text; each [Template::render] call
//! runs the three-stage pipeline — [tokenize], [parse], [render] —
//! against a [Context] and returns the substituted output. The
//! [Environment] loader reads template files from disk.
//!
//! Supported syntax:
//! - `{{ name }}`, with at most one accessor: `name[0]`, `name['key']`,
//!   `name["key"]` or `name.key`.
//! - `{{ a + b }}` arithmetic over `+ - * / %`, folded left to right
//!   with no precedence; division always yields a fractional result.
//! - `{% if flag %}text{% endif %}` single-branch conditionals.
//!
//! Not supported: template inheritance, filters, loops, `else`
//! branches, operator precedence.
//!
//! Binding environments come from any [Context] implementation;
//! [JsonValue] and [YamlValue] are provided.
//!
//!
//! # Samples
//!
//! ## Hello world
//!
//! ```
//! use stencil::{Template, JsonValue};
//!
//! let template = Template::new("Hello {{ name }}!");
//! let context = serde_json::from_str::<JsonValue>(r#"{
//!     "name": "John"
//! }"#).unwrap();
//!
//! let result = template.render(&context).unwrap();
//!
//! assert_eq!(result, "Hello John!")
//! ```
//!
//! ## Arithmetic and conditionals
//!
//! ```
//! use stencil::{Template, YamlValue};
//!
//! let template = Template::new("{% if greet %}hi {% endif %}{{ n + 1 }}");
//! let context = serde_yaml::from_str::<YamlValue>(r#"
//!   greet: true
//!   n: 41
//! "#).unwrap();
//!
//! let result = template.render(&context).unwrap();
//!
//! assert_eq!(result, "hi 42")
//! ```
mod context;
mod error;
mod json;
mod lexer;
mod parser;
mod renderer;
mod template;
mod yaml;

pub use self::context::{Context, ContextRef, Numeric};
pub use self::error::Error;
pub use self::json::JsonValue;
pub use self::lexer::{tokenize, Token, TokenKind};
pub use self::parser::{parse, Index, Node, Op};
pub use self::renderer::render;
pub use self::template::{Environment, Template};
pub use self::yaml::YamlValue;
