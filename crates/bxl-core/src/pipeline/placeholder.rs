//! Placeholder expansion for rename and dimension patterns.
//!
//! A pattern is literal text with `{index}`, `{width}` and `{height}` tokens.
//! Any other brace sequence is kept verbatim.

use crate::error::ItemError;
use crate::types::{extension_of, ItemContext};

/// A recognized `{name}` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Index,
    Width,
    Height,
}

impl Placeholder {
    const ALL: [Placeholder; 3] = [Placeholder::Index, Placeholder::Width, Placeholder::Height];

    fn token(self) -> &'static str {
        match self {
            Placeholder::Index => "{index}",
            Placeholder::Width => "{width}",
            Placeholder::Height => "{height}",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token(Placeholder),
}

/// A parsed pattern, compiled once per batch and expanded once per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Split a pattern into literal runs and tokens.
    pub fn parse(pattern: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while !rest.is_empty() {
            let token = Placeholder::ALL
                .into_iter()
                .find(|p| rest.starts_with(p.token()));
            match token {
                Some(placeholder) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Token(placeholder));
                    rest = &rest[placeholder.token().len()..];
                }
                None => {
                    let mut chars = rest.chars();
                    if let Some(c) = chars.next() {
                        literal.push(c);
                    }
                    rest = chars.as_str();
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    /// The original pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern contains the given token.
    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Token(p) if *p == placeholder))
    }

    /// Whether expansion needs image dimensions.
    pub fn needs_dimensions(&self) -> bool {
        self.contains(Placeholder::Width) || self.contains(Placeholder::Height)
    }

    /// Substitute tokens from `ctx`, then append `original_ext` if the
    /// expanded name has no extension of its own.
    pub fn expand(&self, ctx: &ItemContext, original_ext: &str) -> Result<String, ItemError> {
        let mut name = String::with_capacity(self.source.len() + original_ext.len() + 8);

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => name.push_str(text),
                Segment::Token(Placeholder::Index) => {
                    name.push_str(&format!("{:0width$}", ctx.index, width = ctx.pad_width));
                }
                Segment::Token(Placeholder::Width) => {
                    let dims = ctx.dimensions.ok_or(ItemError::MissingDimension("width"))?;
                    name.push_str(&dims.width.to_string());
                }
                Segment::Token(Placeholder::Height) => {
                    let dims = ctx.dimensions.ok_or(ItemError::MissingDimension("height"))?;
                    name.push_str(&dims.height.to_string());
                }
            }
        }

        if extension_of(&name).is_empty() {
            name.push_str(original_ext);
        }
        Ok(name)
    }
}

/// One-shot expansion of a pattern string.
pub fn expand(template: &str, ctx: &ItemContext, original_ext: &str) -> Result<String, ItemError> {
    Template::parse(template).expand(ctx, original_ext)
}

/// Zero-pad width for a batch: the number of decimal digits in `total`.
pub fn pad_width(total: usize) -> usize {
    total.max(1).to_string().len()
}
