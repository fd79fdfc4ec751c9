//! Lexer for UI markup using logos

use logos::{Lexer, Logos};

use super::ast::{Attribute, TagHead};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    /// `<name attr="value" ...>` or `<name ... />`
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9-]*([^>"']|"[^"]*"|'[^']*')*>"#, open_tag)]
    OpenTag(TagHead),

    /// `</name>`
    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>", close_tag)]
    CloseTag(String),

    // Comments and directives are carried through untouched
    #[regex(r"<!--([^-]|-[^-])*-->", |lex| lex.slice().to_string())]
    #[regex(r"<![a-zA-Z][^>]*>", |lex| lex.slice().to_string())]
    Raw(String),

    /// A `<` that does not start a tag
    #[token("<")]
    Lt,

    #[regex(r"[^<]+", |lex| lex.slice().to_string())]
    Text(String),
}

fn open_tag(lex: &mut Lexer<Token>) -> TagHead {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let name_end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(inner.len());
    let rest = &inner[name_end..];

    TagHead {
        name: inner[..name_end].to_ascii_lowercase(),
        attributes: lex_attributes(rest),
        self_closing: rest.trim_end().ends_with('/'),
    }
}

fn close_tag(lex: &mut Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[2..slice.len() - 1].trim_end().to_ascii_lowercase()
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
enum AttrToken {
    #[regex(r#"[^ \t\n\r"'<>/=]+"#, |lex| lex.slice().to_string())]
    Word(String),

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    Quoted(String),

    #[token("/")]
    Slash,
}

/// Split the inside of an opening tag into attributes
fn lex_attributes(input: &str) -> Vec<Attribute> {
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut awaiting_value = false;

    for tok in AttrToken::lexer(input).filter_map(Result::ok) {
        match tok {
            AttrToken::Word(word) if awaiting_value => {
                if let Some(last) = attributes.last_mut() {
                    last.value = Some(word);
                }
                awaiting_value = false;
            }
            AttrToken::Quoted(value) if awaiting_value => {
                if let Some(last) = attributes.last_mut() {
                    last.value = Some(value);
                }
                awaiting_value = false;
            }
            AttrToken::Word(name) => {
                attributes.push(Attribute::new(name.to_ascii_lowercase(), None));
            }
            AttrToken::Equals => awaiting_value = !attributes.is_empty(),
            AttrToken::Quoted(_) | AttrToken::Slash => awaiting_value = false,
        }
    }

    attributes
}

/// Lex input string into tokens with spans
///
/// Input no token accepts, such as an unterminated tag or comment, comes
/// back as [`Token::Text`] so no source text is lost.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input).spanned().map(|(tok, span)| match tok {
        Ok(tok) => (tok, span),
        Err(_) => (Token::Text(input[span.clone()].to_string()), span),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_open_text_close() {
        let toks = tokens("<span>Hello</span>");
        assert_eq!(toks.len(), 3);
        assert!(matches!(&toks[0], Token::OpenTag(head) if head.name == "span"));
        assert_eq!(toks[1], Token::Text("Hello".to_string()));
        assert_eq!(toks[2], Token::CloseTag("span".to_string()));
    }

    #[test]
    fn test_attribute_forms() {
        let toks = tokens(r#"<input id="name" formatted keepamp='true' size=20 />"#);
        let Token::OpenTag(head) = &toks[0] else {
            panic!("Expected open tag");
        };
        assert!(head.self_closing);
        assert_eq!(head.name, "input");
        assert_eq!(
            head.attributes,
            vec![
                Attribute::new("id", Some("name".to_string())),
                Attribute::new("formatted", None),
                Attribute::new("keepamp", Some("true".to_string())),
                Attribute::new("size", Some("20".to_string())),
            ]
        );
    }

    #[test]
    fn test_quoted_value_may_contain_angle_bracket() {
        let toks = tokens(r#"<a title="1 > 0">x</a>"#);
        let Token::OpenTag(head) = &toks[0] else {
            panic!("Expected open tag");
        };
        assert_eq!(head.attribute("title"), Some("1 > 0"));
    }

    #[test]
    fn test_tag_names_lowercased() {
        let toks = tokens("<DIV></Div >");
        assert!(matches!(&toks[0], Token::OpenTag(head) if head.name == "div"));
        assert_eq!(toks[1], Token::CloseTag("div".to_string()));
    }

    #[test]
    fn test_lone_angle_bracket_is_not_a_tag() {
        assert_eq!(
            tokens("a < b"),
            vec![
                Token::Text("a ".to_string()),
                Token::Lt,
                Token::Text(" b".to_string())
            ]
        );
    }

    fn text_of(toks: &[Token]) -> String {
        toks.iter()
            .map(|t| match t {
                Token::Text(s) => s.as_str(),
                Token::Lt => "<",
                other => panic!("Expected text, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        assert_eq!(text_of(&tokens("t <b c")), "t <b c");
        assert_eq!(text_of(&tokens("Press <Next to continue")), "Press <Next to continue");
    }

    #[test]
    fn test_unterminated_comment_is_text() {
        assert_eq!(text_of(&tokens("a <!-- b")), "a <!-- b");
    }

    #[test]
    fn test_comments_and_doctype_kept_raw() {
        assert_eq!(
            tokens("<!DOCTYPE html><!-- note -->"),
            vec![
                Token::Raw("<!DOCTYPE html>".to_string()),
                Token::Raw("<!-- note -->".to_string())
            ]
        );
    }
}
