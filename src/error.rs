//! Error kinds for the interpreter.
//!
//! Five kinds cover the whole pipeline: lexing, reading, macro argument
//! shape, runtime execution, and name resolution. All of them abort the
//! current top-level expression and are recoverable by the REPL loop.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid character, malformed number, unterminated string.
    #[error("{0}")]
    Tokenizer(String),

    /// Unexpected token, unbalanced parentheses, premature end of input.
    #[error("{0}")]
    Parser(String),

    /// Wrong shape or arity of a macro form's arguments.
    #[error("{0}")]
    MacroArguments(String),

    /// Type mismatch, procedure arity mismatch, arithmetic or semantic
    /// failure, explicit `throw`.
    #[error("{0}")]
    Execution(String),

    /// Lookup or `set!` of an unbound name.
    #[error("{0}")]
    Scope(String),
}

impl Error {
    pub fn tokenizer(message: impl Into<String>) -> Self {
        Error::Tokenizer(message.into())
    }

    pub fn parser(message: impl Into<String>) -> Self {
        Error::Parser(message.into())
    }

    pub fn macro_arguments(message: impl Into<String>) -> Self {
        Error::MacroArguments(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Error::Execution(message.into())
    }

    pub fn scope(message: impl Into<String>) -> Self {
        Error::Scope(message.into())
    }

    /// Name printed before the message in the verbose REPL.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::Tokenizer(_) => "TokenizerError",
            Error::Parser(_) => "ParserError",
            Error::MacroArguments(_) => "MacroArgumentsError",
            Error::Execution(_) => "ExecutionError",
            Error::Scope(_) => "ScopeError",
        }
    }

    /// Contest-judge classification: syntax errors terminate the REPL.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::Tokenizer(_) | Error::Parser(_) | Error::MacroArguments(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Error::tokenizer("x").kind_name(), "TokenizerError");
        assert_eq!(Error::parser("x").kind_name(), "ParserError");
        assert_eq!(
            Error::macro_arguments("x").kind_name(),
            "MacroArgumentsError"
        );
        assert_eq!(Error::execution("x").kind_name(), "ExecutionError");
        assert_eq!(Error::scope("x").kind_name(), "ScopeError");
    }

    #[test]
    fn test_syntax_classification() {
        assert!(Error::tokenizer("x").is_syntax());
        assert!(Error::parser("x").is_syntax());
        assert!(Error::macro_arguments("x").is_syntax());
        assert!(!Error::execution("x").is_syntax());
        assert!(!Error::scope("x").is_syntax());
    }

    #[test]
    fn test_display_is_plain_message() {
        let err = Error::execution("car: expected pair");
        assert_eq!(err.to_string(), "car: expected pair");
    }
}
