//! `{field}` templates with `{{`/`}}` escapes.

use std::fmt;

use super::context::Context;

/// Error raised while parsing or expanding a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// Template text is not well formed.
    Malformed {
        /// Format-set key of the template.
        template: String,
        /// What is wrong.
        reason: String,
    },
    /// A referenced field is not defined in the context.
    UndefinedField {
        /// Format-set key of the template.
        template: String,
        /// Missing field name.
        field: String,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { template, reason } => {
                write!(f, "malformed template '{template}': {reason}")
            }
            Self::UndefinedField { template, field } => {
                write!(f, "template '{template}' uses undefined field '{field}'")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

fn is_field_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Template {
    /// What: Parse template source.
    ///
    /// Inputs:
    /// - `name`: Format-set key, used in error messages.
    /// - `source`: Template text.
    ///
    /// Output:
    /// - The parsed template.
    ///
    /// # Errors
    /// - `TemplateError::Malformed` for unbalanced braces or bad field names.
    ///
    /// Details:
    /// - `{name}` is a field; names use ASCII letters, digits and `_`.
    /// - `{{` and `}}` produce literal braces. Any other brace is an error.
    pub fn parse(name: &str, source: &str) -> Result<Self, TemplateError> {
        let malformed = |reason: String| TemplateError::Malformed {
            template: name.to_string(),
            reason,
        };
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();
        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, n)| n == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, n)| n == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(malformed(format!("single '}}' at offset {pos}"))),
                '{' => {
                    let mut field = String::new();
                    let mut closed = false;
                    for (_, fc) in chars.by_ref() {
                        if fc == '}' {
                            closed = true;
                            break;
                        }
                        field.push(fc);
                    }
                    if !closed {
                        return Err(malformed(format!("unterminated field at offset {pos}")));
                    }
                    if field.is_empty() || !field.chars().all(is_field_char) {
                        return Err(malformed(format!("invalid field name '{field}'")));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self {
            name: name.to_string(),
            segments,
        })
    }

    /// Format-set key of the template.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(f) => Some(f.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// What: Expand the template against `ctx`.
    ///
    /// Output:
    /// - Rendered text.
    ///
    /// # Errors
    /// - `TemplateError::UndefinedField` for the first field missing from
    ///   the context.
    pub fn render(&self, ctx: &Context) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => {
                    let value = ctx.get(field).ok_or_else(|| TemplateError::UndefinedField {
                        template: self.name.clone(),
                        field: field.clone(),
                    })?;
                    out.push_str(&value.render(ctx.list_sep()));
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        let mut ctx = Context::new(", ");
        ctx.insert("c", "dev-lang");
        ctx.insert("p", "foo");
        ctx
    }

    #[test]
    /// What: Fields are substituted and doubled braces become literals.
    ///
    /// - Input: `{{{c}}}/{p}`
    /// - Output: `{dev-lang}/foo`
    fn renders_fields_and_escapes() {
        let tpl = Template::parse("lvcp", "{{{c}}}/{p}").expect("parse");
        assert_eq!(tpl.render(&ctx()).expect("render"), "{dev-lang}/foo");
        assert_eq!(tpl.fields().collect::<Vec<_>>(), ["c", "p"]);
    }

    #[test]
    /// What: A field missing from the context is reported by name.
    fn undefined_field_is_an_error() {
        let tpl = Template::parse("lvcp", "{c} {homepage}").expect("parse");
        let err = tpl.render(&ctx()).expect_err("missing field");
        assert_eq!(
            err,
            TemplateError::UndefinedField {
                template: "lvcp".into(),
                field: "homepage".into()
            }
        );
    }

    #[test]
    /// What: Broken syntax is rejected at parse time.
    fn malformed_templates_fail_to_parse() {
        for bad in ["{c", "c}", "{}", "{a.b}", "{a:>5}"] {
            assert!(
                matches!(Template::parse("t", bad), Err(TemplateError::Malformed { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    /// What: Non-ASCII literals pass through untouched.
    fn keeps_unicode_literals() {
        let tpl = Template::parse("t", "→ {p} ✓\n").expect("parse");
        assert_eq!(tpl.render(&ctx()).expect("render"), "→ foo ✓\n");
    }
}
