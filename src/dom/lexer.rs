//! Lexer for HTML fragments using logos

use logos::{Lexer, Logos};

use super::entities::unescape_html;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A parsed start tag
#[derive(Debug, Clone, PartialEq)]
pub struct StartTag {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub self_closing: bool,
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum HtmlToken {
    // Comments run to the next `-->` (or the end of input)
    #[token("<!--", comment)]
    Comment(String),

    // <!DOCTYPE ...> and friends
    #[regex(r"<![A-Za-z][^>]*>")]
    Declaration,

    #[regex(
        r#"<[A-Za-z][A-Za-z0-9-]*(\s+[^\s"'>/=]+(\s*=\s*("[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*\s*/?>"#,
        start_tag
    )]
    StartTag(StartTag),

    #[regex(r"</[A-Za-z][A-Za-z0-9-]*\s*>", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].trim().to_ascii_lowercase()
    })]
    EndTag(String),

    // Raw text, entities still encoded
    #[regex(r"[^<]+", |lex| lex.slice().to_string())]
    Text(String),

    // A `<` that does not open a tag is literal text
    #[token("<")]
    Lt,
}

fn comment(lex: &mut Lexer<HtmlToken>) -> String {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => {
            let body = rest[..end].to_string();
            lex.bump(end + 3);
            body
        }
        None => {
            let body = rest.to_string();
            lex.bump(rest.len());
            body
        }
    }
}

fn start_tag(lex: &mut Lexer<HtmlToken>) -> StartTag {
    parse_start_tag(lex.slice())
}

/// Tokens inside a start tag, after the tag name
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"\s+")]
enum AttrToken {
    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); s[1..s.len() - 1].to_string() })]
    #[regex(r#"'[^']*'"#, |lex| { let s = lex.slice(); s[1..s.len() - 1].to_string() })]
    Quoted(String),

    #[regex(r#"[^\s"'=]+"#, |lex| lex.slice().to_string())]
    Bare(String),
}

fn parse_start_tag(raw: &str) -> StartTag {
    let inner = raw.trim_start_matches('<').trim_end_matches('>');
    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (inner, false),
    };

    let name_end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    let tokens: Vec<AttrToken> = AttrToken::lexer(&inner[name_end..])
        .filter_map(|tok| tok.ok())
        .collect();

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let key = match &tokens[i] {
            AttrToken::Bare(k) => k.to_ascii_lowercase(),
            _ => {
                i += 1;
                continue;
            }
        };
        let mut value = String::new();
        if matches!(tokens.get(i + 1), Some(AttrToken::Equals)) {
            match tokens.get(i + 2) {
                Some(AttrToken::Quoted(v)) | Some(AttrToken::Bare(v)) => {
                    value = unescape_html(v);
                    i += 3;
                }
                _ => i += 2,
            }
        } else {
            i += 1;
        }
        // First occurrence wins, as in browsers
        if !attrs.iter().any(|(k, _)| *k == key) {
            attrs.push((key, value));
        }
    }

    StartTag {
        name,
        attrs,
        self_closing,
    }
}

/// Lex an HTML fragment into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (HtmlToken, Span)> + '_ {
    HtmlToken::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
