//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::markup::ast::*;
use crate::markup::lexer::Token;

/// Parse markup source into a list of top-level nodes
pub fn parse(input: &str) -> Result<Vec<MarkupNode>, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::markup::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    fragment_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

fn fragment_parser<'a, I>() -> impl Parser<'a, I, Vec<MarkupNode>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let node = recursive(|node| {
        let character_data = select! {
            Token::Text(s) => MarkupNode::Text(s),
            Token::Lt => MarkupNode::Text("<".to_string()),
            Token::Raw(s) => MarkupNode::Raw(s),
        };

        let leaf_element = select! {
            Token::OpenTag(head) if head.is_leaf() => MarkupNode::Element(ElementNode {
                head,
                children: Vec::new(),
            }),
        };

        let open_tag = select! {
            Token::OpenTag(head) if !head.is_leaf() => head,
        };

        let close_tag = select! {
            Token::CloseTag(name) => name,
        };

        // Closing tag must name the element it closes
        let element = open_tag
            .then(node.clone().repeated().collect::<Vec<_>>())
            .then(close_tag)
            .try_map(|((head, children), close), span| {
                if close == head.name {
                    Ok(MarkupNode::Element(ElementNode { head, children }))
                } else {
                    Err(Rich::custom(
                        span,
                        format!("expected </{}> but found </{}>", head.name, close),
                    ))
                }
            });

        choice((character_data, leaf_element, element)).boxed()
    });

    node.repeated().collect::<Vec<_>>().then_ignore(end())
}
