//! Syntax error types and rendering utilities.

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

/// Related location information for a syntax error.
/// Used to point to where a construct started (e.g., an unclosed `[`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub range: TextRange,
    pub message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

/// A syntax error with location, message, and optional related span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub range: TextRange,
    pub message: String,
    pub related: Option<RelatedInfo>,
}

impl SyntaxError {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
            related: None,
        }
    }

    pub fn with_related(
        range: TextRange,
        message: impl Into<String>,
        related: RelatedInfo,
    ) -> Self {
        Self {
            range,
            message: message.into(),
            related: Some(related),
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error at {}..{}: {}",
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if let Some(related) = &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// A rejected type expression: the input text plus every error found in it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type expression `{text}`: {}", first_message(.errors))]
pub struct ParseError {
    pub text: String,
    pub errors: Vec<SyntaxError>,
}

impl ParseError {
    pub fn new(text: impl Into<String>, errors: Vec<SyntaxError>) -> Self {
        Self {
            text: text.into(),
            errors,
        }
    }

    /// Render with source snippets, optionally labelled with a path.
    pub fn render(&self, path: Option<&str>) -> String {
        render_errors(&self.text, &self.errors, path)
    }
}

fn first_message(errors: &[SyntaxError]) -> &str {
    errors.first().map_or("no errors", |e| e.message.as_str())
}

/// Render syntax errors using annotate-snippets for nice diagnostic output.
pub fn render_errors(source: &str, errors: &[SyntaxError], path: Option<&str>) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let renderer = Renderer::plain();
    let mut output = String::new();

    for (i, err) in errors.iter().enumerate() {
        let (start, end) = visible_span(source, err.range);

        let mut snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(start..end).label(&err.message));

        if let Some(p) = path {
            snippet = snippet.path(p);
        }

        if let Some(related) = &err.related {
            let (rel_start, rel_end) = visible_span(source, related.range);
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(rel_start..rel_end)
                    .label(&related.message),
            );
        }

        let report: Vec<Group> = vec![Level::ERROR.primary_title(&err.message).element(snippet)];

        if i > 0 {
            output.push('\n');
        }
        output.push_str(&renderer.render(&report).to_string());
    }

    output
}

// Zero-width spans are widened to one char so the caret stays visible.
fn visible_span(source: &str, range: TextRange) -> (usize, usize) {
    let start: usize = range.start().into();
    let end: usize = range.end().into();
    if start == end {
        (start, (start + 1).min(source.len()))
    } else {
        (start, end)
    }
}
