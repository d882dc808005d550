//! Token kinds for type expressions.
//!
//! Logos is derived directly on this enum. `Garbage` and `Eof` carry no
//! token attributes: the former is produced by lexer post-processing, the
//! latter is the parser's end-of-input sentinel.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("[")]
    BracketOpen = 0,

    #[token("]")]
    BracketClose,

    #[token(",")]
    Comma,

    /// `t <: bound`: the generic is a subtype of its bounds
    #[token("<:")]
    Subtype,

    /// `t >: bound`: the generic is a supertype of its bounds
    #[token(">:")]
    Supertype,

    /// Generic identifier: exactly one ASCII letter
    #[regex(r"[a-zA-Z]")]
    GenericId,

    /// Explicit identifier: a letter followed by at least one letter, digit or underscore
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]+")]
    ExplicitId,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// Consecutive unrecognized characters coalesced into one token
    Garbage,

    /// End of input
    Eof,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace)
    }

    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            BracketOpen => "`[`",
            BracketClose => "`]`",
            Comma => "`,`",
            Subtype => "`<:`",
            Supertype => "`>:`",
            GenericId => "generic identifier",
            ExplicitId => "type name",
            Whitespace => "whitespace",
            Garbage => "invalid characters",
            Eof => "end of input",
        }
    }
}
