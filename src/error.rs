/// Failures raised by the pipeline or the file loader.
///
/// `Syntax` and `Parse` abort before any output is produced; the
/// remaining variants surface binding-resolution and arithmetic
/// failures at evaluation time. Nothing is recovered internally and
/// there is no partial output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed marker found while tokenizing.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Token sequence does not match any node shape.
    #[error("parse error: {0}")]
    Parse(String),
    /// A referenced name is absent from the render context.
    #[error("undefined name `{0}`")]
    Undefined(String),
    /// A key accessor found no entry under the named binding.
    #[error("`{name}` has no entry `{key}`")]
    MissingKey { name: String, key: String },
    /// An index accessor fell outside the named sequence.
    #[error("index {index} is out of range for `{name}`")]
    OutOfRange { name: String, index: usize },
    /// An arithmetic operand did not resolve to a number.
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("division by zero")]
    DivisionByZero,
    /// Loading a template file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
