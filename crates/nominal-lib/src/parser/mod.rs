//! Type-expression parser.
//!
//! Turns text such as `list[t <: number]` into a [`TypeInstance`] tree. No
//! hierarchy lookups happen here: whether the named types exist is checked later
//! by [`TypeHierarchy`](crate::TypeHierarchy).
//!
//! # Architecture
//!
//! - Zero-copy lexing: logos tokens carry `TextRange` spans, text is sliced on demand
//! - Trivia (whitespace) is dropped before parsing
//! - The recursive-descent parser builds instances directly, without a syntax tree
//!
//! Parsing is all-or-nothing. The first error aborts and is reported as a
//! [`ParseError`] holding the input and its [`SyntaxError`]s.

pub mod error;
pub mod lexer;
pub mod syntax_kind;

mod grammar;


pub use error::{ParseError, RelatedInfo, SyntaxError, render_errors};
pub use syntax_kind::SyntaxKind;

use nominal_core::TypeInstance;

use grammar::Parser;
use lexer::lex;

/// Maximum bracket nesting accepted in one type expression.
pub const MAX_DEPTH: u32 = 64;

/// Parse one type expression.
pub fn parse_type(source: &str) -> crate::Result<TypeInstance> {
    match Parser::new(source, lex(source)).parse() {
        Ok(instance) => Ok(instance),
        Err(errors) => {
            tracing::trace!(source, errors = errors.len(), "rejected type expression");
            Err(ParseError::new(source, errors).into())
        }
    }
}
