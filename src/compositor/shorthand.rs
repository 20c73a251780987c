//! Placeholder shorthand expansion using logos
//!
//! Authors may write `<<name>>` or `{{name}}` instead of a full placeholder
//! span, with an optional `:latex` format spec. Shorthand naming a known
//! field becomes a span; anything else stays literal. Literal angle
//! brackets are written `\<` and `\>`.

use logos::Logos;

use super::placeholder::{FormatSpec, Placeholder};
use crate::config::CompositorConfig;
use crate::dom::serialize_element;
use crate::error::{Span, TemplateError};

/// A field reference as written in the template
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    pub name: String,
    pub spec: Option<String>,
}

fn field_ref(slice: &str) -> FieldRef {
    let inner = slice[2..slice.len() - 2].trim();
    match inner.split_once(':') {
        Some((name, spec)) => {
            let spec = spec.trim();
            FieldRef {
                name: name.trim().to_string(),
                spec: (!spec.is_empty()).then(|| spec.to_string()),
            }
        }
        None => FieldRef {
            name: inner.to_string(),
            spec: None,
        },
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum ShorthandToken {
    #[regex(r"<<[A-Za-z_][A-Za-z0-9_]*(:[A-Za-z0-9_-]*)?>>", |lex| field_ref(lex.slice()))]
    AngleField(FieldRef),

    #[regex(
        r"\{\{[ \t]*[A-Za-z_][A-Za-z0-9_]*[ \t]*(:[ \t]*[A-Za-z0-9_-]*[ \t]*)?\}\}",
        |lex| field_ref(lex.slice())
    )]
    BraceField(FieldRef),

    #[token(r"\<")]
    EscapedLt,
    #[token(r"\>")]
    EscapedGt,
    #[token("<<")]
    DoubleLt,
    #[token(">>")]
    DoubleGt,

    #[regex(r"[^<>\\{]+")]
    Text,

    // Single characters that start none of the above
    #[regex(r"[<>\\{]")]
    Char,
}

/// Expand shorthand for the fields accepted by `is_known`.
///
/// Fails on a format spec other than `latex` for a known field.
pub fn expand_shorthand(
    template: &str,
    is_known: &dyn Fn(&str) -> bool,
    config: &CompositorConfig,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut lexer = ShorthandToken::lexer(template);
    while let Some(token) = lexer.next() {
        let span: Span = lexer.span();
        let slice = lexer.slice();
        match token {
            Ok(ShorthandToken::AngleField(field)) | Ok(ShorthandToken::BraceField(field))
                if is_known(&field.name) =>
            {
                let format = match field.spec.as_deref() {
                    None => FormatSpec::Rich,
                    Some("latex") => FormatSpec::Latex,
                    Some(other) => {
                        return Err(TemplateError::UnknownFormatSpec {
                            field: field.name,
                            spec: other.to_string(),
                            span,
                        })
                    }
                };
                let el = Placeholder::new(field.name, format).to_element(config);
                out.push_str(&serialize_element(&el));
            }
            Ok(ShorthandToken::AngleField(_)) => {
                tracing::debug!(shorthand = slice, "leaving unknown field literal");
                out.push_str(&slice.replace('<', "&lt;").replace('>', "&gt;"));
            }
            Ok(ShorthandToken::EscapedLt) => out.push_str("&lt;"),
            Ok(ShorthandToken::EscapedGt) => out.push_str("&gt;"),
            Ok(ShorthandToken::DoubleLt) => out.push_str("&lt;&lt;"),
            Ok(ShorthandToken::DoubleGt) => out.push_str("&gt;&gt;"),
            Ok(_) | Err(_) => out.push_str(slice),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expand(template: &str) -> Result<String, TemplateError> {
        expand_shorthand(
            template,
            &|name| name == "x" || name == "y",
            &CompositorConfig::default(),
        )
    }

    #[test]
    fn test_angle_shorthand() {
        assert_eq!(
            expand("a <<x>> b <<y:latex>>").expect("expand"),
            r#"a <span data-field-name="x"></span> b <span data-field-name="y" data-format-spec="latex"></span>"#
        );
    }

    #[test]
    fn test_brace_shorthand_allows_spaces() {
        assert_eq!(
            expand("{{ x : latex }}").expect("expand"),
            r#"<span data-field-name="x" data-format-spec="latex"></span>"#
        );
    }

    #[test]
    fn test_unknown_fields_stay_literal() {
        assert_eq!(expand("<<z>> {{z}}").expect("expand"), "&lt;&lt;z&gt;&gt; {{z}}");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            expand(r"a \< b, c << d >> e, <i>f</i>").expect("expand"),
            "a &lt; b, c &lt;&lt; d &gt;&gt; e, <i>f</i>"
        );
    }

    #[test]
    fn test_unknown_format_spec_has_span() {
        let err = expand("Value: <<x:bold>>").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownFormatSpec {
                field: "x".to_string(),
                spec: "bold".to_string(),
                span: 7..17,
            }
        );
    }

    #[test]
    fn test_unknown_format_spec_on_unknown_field_is_literal() {
        assert_eq!(expand("<<z:bold>>").expect("expand"), "&lt;&lt;z:bold&gt;&gt;");
    }

    #[test]
    fn test_latex_braces_untouched() {
        assert_eq!(expand(r"$\frac{1}{2}$").expect("expand"), r"$\frac{1}{2}$");
    }
}
