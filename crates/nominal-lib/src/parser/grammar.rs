//! Recursive-descent parser building type instances straight from tokens.
//!
//! Grammar:
//!
//! ```text
//! type          := explicit | unconstrained | constrained
//! explicit      := EID ('[' type (',' type)* ']')?
//! unconstrained := GID
//! constrained   := GID '>:' boundsList
//!                | GID '<:' boundsList
//!                | boundsList '<:' GID '<:' boundsList
//! boundsList    := bound (',' bound)*
//! bound         := unconstrained | explicit
//! ```
//!
//! Every production starts with a comma-separated list of atoms; what follows the
//! list (`<:`, `>:` or nothing) decides how the atoms are read. Bound lists are
//! greedy: inside brackets a trailing bound list swallows the remaining items, and
//! items before a `GID <:` head are separate parameters.
//!
//! Parsing is all-or-nothing: the first error aborts the whole expression.

use nominal_core::{GenericInstance, TypeInstance};
use rowan::{TextRange, TextSize};

use super::MAX_DEPTH;
use super::error::{RelatedInfo, SyntaxError};
use super::lexer::{Token, token_text};
use super::syntax_kind::SyntaxKind;

/// Where a list of atoms is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// The whole input: must produce exactly one type.
    Root,
    /// Between `[` and `]`: may produce several parameters.
    Params,
}

/// A parsed atom and the source range it covers.
#[derive(Debug, Clone)]
struct Item {
    instance: TypeInstance,
    span: TextRange,
}

/// The production was abandoned; the reason is already in `Parser::errors`.
struct Abort;

type PResult<T> = Result<T, Abort>;

pub struct Parser<'src> {
    source: &'src str,
    /// Non-trivia tokens only.
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<SyntaxError>,
    depth: u32,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens: tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect(),
            pos: 0,
            errors: Vec::new(),
            depth: 0,
        }
    }

    pub fn parse(mut self) -> Result<TypeInstance, Vec<SyntaxError>> {
        match self.parse_root() {
            Ok(instance) if self.errors.is_empty() => Ok(instance),
            _ => Err(self.errors),
        }
    }

    fn parse_root(&mut self) -> PResult<TypeInstance> {
        let mut types = self.parse_type_list(Context::Root)?;

        if !self.at(SyntaxKind::Eof) {
            let found = self.current().describe();
            return self.error_here(format!("unexpected {found} after type"));
        }

        match types.pop() {
            Some(instance) if types.is_empty() => Ok(instance),
            _ => self.error_here("expected a single type"),
        }
    }

    /// `atoms ('>:' atoms | '<:' atoms ('<:' atoms)?)?`
    fn parse_type_list(&mut self, ctx: Context) -> PResult<Vec<TypeInstance>> {
        let mut first = self.parse_atom_list()?;

        match self.current() {
            SyntaxKind::Supertype => {
                let op = self.bump();
                let head = self.take_generic_head(&mut first, op, ctx)?;
                let lower = self.parse_atom_list()?;

                let mut types = into_instances(first);
                types.push(GenericInstance::bounded(head, into_instances(lower), []).into());
                Ok(types)
            }
            SyntaxKind::Subtype => {
                let op = self.bump();
                let second = self.parse_atom_list()?;

                if self.at(SyntaxKind::Subtype) {
                    let op = self.bump();
                    let head = self.single_generic(second, op)?;
                    let upper = self.parse_atom_list()?;
                    let generic = GenericInstance::bounded(
                        head,
                        into_instances(first),
                        into_instances(upper),
                    );
                    return Ok(vec![generic.into()]);
                }

                let head = self.take_generic_head(&mut first, op, ctx)?;
                let mut types = into_instances(first);
                types.push(GenericInstance::bounded(head, [], into_instances(second)).into());
                Ok(types)
            }
            _ => {
                if ctx == Context::Root && first.len() > 1 {
                    return self.error_at(first[1].span, "expected a single type");
                }
                Ok(into_instances(first))
            }
        }
    }

    /// `atom (',' atom)*`
    fn parse_atom_list(&mut self) -> PResult<Vec<Item>> {
        let mut items = vec![self.parse_atom()?];
        while self.at(SyntaxKind::Comma) {
            self.bump();
            items.push(self.parse_atom()?);
        }
        Ok(items)
    }

    fn parse_atom(&mut self) -> PResult<Item> {
        match self.current() {
            SyntaxKind::GenericId => {
                let token = self.bump();
                Ok(Item {
                    instance: TypeInstance::generic(self.text(&token)),
                    span: token.span,
                })
            }
            SyntaxKind::ExplicitId => self.parse_explicit(),
            SyntaxKind::Garbage => {
                let span = self.current_span();
                let text = &self.source[std::ops::Range::<usize>::from(span)];
                self.error_at(span, format!("unexpected characters `{text}`"))
            }
            SyntaxKind::Eof => self.error_here("expected a type"),
            other => {
                let found = other.describe();
                self.error_here(format!("expected a type, found {found}"))
            }
        }
    }

    /// `EID ('[' type_list ']')?`
    fn parse_explicit(&mut self) -> PResult<Item> {
        let name = self.bump();
        let mut span = name.span;
        let mut params = Vec::new();

        if self.at(SyntaxKind::BracketOpen) {
            let open = self.bump();
            self.enter()?;
            params = self.parse_type_list(Context::Params)?;
            self.depth -= 1;

            if !self.at(SyntaxKind::BracketClose) {
                let found = self.current().describe();
                let error = SyntaxError::with_related(
                    self.current_span(),
                    format!("expected `]`, found {found}"),
                    RelatedInfo::new(open.span, "`[` opened here"),
                );
                self.errors.push(error);
                return Err(Abort);
            }
            let close = self.bump();
            span = TextRange::new(name.span.start(), close.span.end());
        }

        Ok(Item {
            instance: TypeInstance::explicit(self.text(&name), params),
            span,
        })
    }

    /// Pop the generic identifier that heads a `GID <:` / `GID >:` production.
    fn take_generic_head(&mut self, items: &mut Vec<Item>, op: Token, ctx: Context) -> PResult<String> {
        let Some(item) = items.pop() else {
            return self.error_at(op.span, "expected a generic identifier");
        };

        let name = match item.instance {
            TypeInstance::Generic(generic) => generic.name,
            TypeInstance::Explicit(_) => {
                let operator = op.kind.describe();
                return self.error_at(
                    item.span,
                    format!("expected a generic identifier before {operator}"),
                );
            }
        };

        if ctx == Context::Root
            && let Some(extra) = items.first()
        {
            return self.error_at(extra.span, "expected a single type");
        }

        Ok(name)
    }

    /// The middle of `bounds <: GID <: bounds`.
    fn single_generic(&mut self, items: Vec<Item>, op: Token) -> PResult<String> {
        if let Some(extra) = items.get(1) {
            return self.error_at(extra.span, "expected a single generic identifier");
        }

        match items.into_iter().next() {
            Some(Item {
                instance: TypeInstance::Generic(generic),
                ..
            }) => Ok(generic.name),
            Some(item) => self.error_at(item.span, "expected a generic identifier"),
            None => self.error_at(op.span, "expected a generic identifier"),
        }
    }

    fn enter(&mut self) -> PResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return self.error_here("type expression nested too deeply");
        }
        Ok(())
    }

    // ========== Token access ==========

    /// Current token kind. Returns `Eof` past the last token.
    fn current(&self) -> SyntaxKind {
        self.tokens
            .get(self.pos)
            .map_or(SyntaxKind::Eof, |t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn current_span(&self) -> TextRange {
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    /// Consume the current token. Callers check the kind first, so never at EOF.
    fn bump(&mut self) -> Token {
        assert!(self.pos < self.tokens.len(), "bump called at EOF");
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn text(&self, token: &Token) -> &'src str {
        token_text(self.source, token)
    }

    // ========== Errors ==========

    fn error_at<T>(&mut self, range: TextRange, message: impl Into<String>) -> PResult<T> {
        self.errors.push(SyntaxError::new(range, message));
        Err(Abort)
    }

    fn error_here<T>(&mut self, message: impl Into<String>) -> PResult<T> {
        let range = self.current_span();
        self.error_at(range, message)
    }
}

fn into_instances(items: Vec<Item>) -> Vec<TypeInstance> {
    items.into_iter().map(|item| item.instance).collect()
}
