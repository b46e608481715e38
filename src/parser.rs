use crate::error::Error;
use crate::lexer::{Token, TokenKind};

/// One element of the ordered node sequence built from the tokens.
///
/// Nodes are produced per render call and never shared or mutated
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Start of the output program; exactly one, always first.
    Root,
    /// A structural marker token that contributes no output.
    Skip,
    /// A literal text fragment, newline-escaped.
    Data(String),
    /// A reference to a binding by name.
    Name(String),
    /// Indexed or attribute access on a named binding.
    Get(String, Index),
    /// An integer literal.
    Const(i64),
    /// A binary arithmetic expression, folded left to right.
    Calc {
        op: Op,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// A single-branch truthiness conditional over a literal body.
    If { test: String, body: String },
}

/// The accessor form of a [Node::Get], fixed at parse time by the
/// token shape: `[123]` is sequence access, `['k']` and `.k` are
/// mapping access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Index {
    Item(usize),
    Key(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// Newlines in literal text are held as the two-character escape so a
/// fragment stays a single line; emission expands them back.
pub(crate) fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n")
}

pub(crate) fn expand_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Builds the node sequence from `tokens` in a single pass, emitting
/// [Node::Root] first.
///
/// Assumes the tokens already passed [tokenize] validation; delimiter
/// balance is not re-checked here. An accessor or operand shape that
/// does not match fails with [Error::Parse].
///
/// [tokenize]: crate::lexer::tokenize
pub fn parse(tokens: &[Token]) -> Result<Vec<Node>, Error> {
    let mut nodes = vec![Node::Root];
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        match token.kind {
            TokenKind::Data => {
                nodes.push(Node::Data(escape_newlines(&token.text)));
            }
            TokenKind::VariableBegin | TokenKind::VariableEnd => {
                nodes.push(Node::Skip);
            }
            TokenKind::Name => {
                let (node, last) = name_or_get(tokens, i)?;
                nodes.push(node);
                i = last;
            }
            TokenKind::Integer => {
                nodes.push(Node::Const(integer(&token.text)?));
            }
            TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Mul
            | TokenKind::Div
            | TokenKind::Mod => {
                let left = match nodes.pop() {
                    Some(
                        node @ (Node::Name(_)
                        | Node::Get(..)
                        | Node::Const(_)
                        | Node::Calc { .. }),
                    ) => node,
                    _ => return Err(parse_error("operator without a left operand")),
                };
                let (right, last) = operand(tokens, i + 1)?;
                nodes.push(Node::Calc {
                    op: operation(token.kind),
                    left: Box::new(left),
                    right: Box::new(right),
                });
                i = last;
            }
            TokenKind::BlockBegin => {
                let (node, last) = if_construct(tokens, i)?;
                nodes.push(node);
                i = last;
            }
            TokenKind::BlockEnd
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::Str
            | TokenKind::Dot => {
                return Err(parse_error(&format!("unexpected `{}`", token.text)));
            }
        }
        i += 1;
    }
    Ok(nodes)
}

/// A name token at `i`, resolved with one token of lookahead into a
/// bare [Node::Name] or, via `[..]` / `.`, a [Node::Get]. Returns the
/// node and the index of the last consumed token.
fn name_or_get(tokens: &[Token], i: usize) -> Result<(Node, usize), Error> {
    let name = tokens[i].text.clone();
    match tokens.get(i + 1).map(|t| t.kind) {
        Some(TokenKind::LBracket) => {
            let index = match tokens.get(i + 2) {
                Some(t) if t.kind == TokenKind::Integer => Index::Item(item_index(&t.text)?),
                Some(t) if t.kind == TokenKind::Str => Index::Key(t.text.clone()),
                _ => return Err(parse_error("expected an integer or string index")),
            };
            match tokens.get(i + 3).map(|t| t.kind) {
                Some(TokenKind::RBracket) => Ok((Node::Get(name, index), i + 3)),
                _ => Err(parse_error("missing `]` after index")),
            }
        }
        Some(TokenKind::Dot) => match tokens.get(i + 2) {
            Some(t) if t.kind == TokenKind::Name => {
                Ok((Node::Get(name, Index::Key(t.text.clone())), i + 2))
            }
            _ => Err(parse_error("expected a name after `.`")),
        },
        _ => Ok((Node::Name(name), i)),
    }
}

/// The right-hand side of an operator: a name with optional accessor,
/// or an integer.
fn operand(tokens: &[Token], i: usize) -> Result<(Node, usize), Error> {
    match tokens.get(i) {
        Some(t) if t.kind == TokenKind::Name => name_or_get(tokens, i),
        Some(t) if t.kind == TokenKind::Integer => Ok((Node::Const(integer(&t.text)?), i)),
        _ => Err(parse_error("expected a name or integer operand")),
    }
}

/// `{% if test %}` data `{% endif %}`, collapsed into one [Node::If].
fn if_construct(tokens: &[Token], i: usize) -> Result<(Node, usize), Error> {
    let keyword = match tokens.get(i + 1) {
        Some(t) if t.kind == TokenKind::Name => t.text.as_str(),
        _ => return Err(parse_error("expected a statement keyword")),
    };
    if keyword != "if" {
        return Err(parse_error(&format!("unknown statement `{}`", keyword)));
    }
    let test = match tokens.get(i + 2) {
        Some(t) if t.kind == TokenKind::Name => t.text.clone(),
        _ => return Err(parse_error("`if` test must be a name")),
    };
    expect(tokens, i + 3, TokenKind::BlockEnd, "missing `%}` after `if`")?;
    let body = match tokens.get(i + 4) {
        Some(t) if t.kind == TokenKind::Data => escape_newlines(&t.text),
        _ => return Err(parse_error("`if` body must be literal text")),
    };
    expect(tokens, i + 5, TokenKind::BlockBegin, "missing `{% endif %}`")?;
    match tokens.get(i + 6) {
        Some(t) if t.kind == TokenKind::Name && t.text == "endif" => {}
        _ => return Err(parse_error("missing `{% endif %}`")),
    }
    expect(tokens, i + 7, TokenKind::BlockEnd, "missing `%}` after `endif`")?;
    Ok((Node::If { test, body }, i + 7))
}

fn expect(tokens: &[Token], i: usize, kind: TokenKind, message: &str) -> Result<(), Error> {
    match tokens.get(i) {
        Some(t) if t.kind == kind => Ok(()),
        _ => Err(parse_error(message)),
    }
}

fn operation(kind: TokenKind) -> Op {
    match kind {
        TokenKind::Add => Op::Add,
        TokenKind::Sub => Op::Sub,
        TokenKind::Mul => Op::Mul,
        TokenKind::Div => Op::Div,
        _ => Op::Mod,
    }
}

fn integer(text: &str) -> Result<i64, Error> {
    text.parse()
        .map_err(|_| parse_error(&format!("integer literal `{}` is out of range", text)))
}

fn item_index(text: &str) -> Result<usize, Error> {
    text.parse()
        .map_err(|_| parse_error(&format!("index `{}` is out of range", text)))
}

fn parse_error(message: &str) -> Error {
    Error::Parse(message.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind::*;

    #[test]
    fn data_and_variable() {
        let nodes = parse(&tokens(&[
            (Data, "<html>"),
            (VariableBegin, "{{"),
            (Name, "dummy"),
            (VariableEnd, "}}"),
            (Data, "</html>"),
        ]))
        .unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Root,
                Node::Data("<html>".to_owned()),
                Node::Skip,
                Node::Name("dummy".to_owned()),
                Node::Skip,
                Node::Data("</html>".to_owned()),
            ]
        );
    }

    #[test]
    fn item_access() {
        let nodes = parse(&tokens(&[
            (VariableBegin, "{{"),
            (Name, "dummy"),
            (LBracket, "["),
            (Integer, "0"),
            (RBracket, "]"),
            (VariableEnd, "}}"),
        ]))
        .unwrap();
        assert_eq!(nodes[2], Node::Get("dummy".to_owned(), Index::Item(0)));
    }

    #[test]
    fn key_access() {
        let nodes = parse(&tokens(&[
            (VariableBegin, "{{"),
            (Name, "dummy"),
            (LBracket, "["),
            (Str, "key"),
            (RBracket, "]"),
            (VariableEnd, "}}"),
        ]))
        .unwrap();
        assert_eq!(
            nodes[2],
            Node::Get("dummy".to_owned(), Index::Key("key".to_owned()))
        );
    }

    #[test]
    fn attribute_access() {
        let nodes = parse(&tokens(&[
            (VariableBegin, "{{"),
            (Name, "dummy"),
            (Dot, "."),
            (Name, "key"),
            (VariableEnd, "}}"),
        ]))
        .unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Root,
                Node::Skip,
                Node::Get("dummy".to_owned(), Index::Key("key".to_owned())),
                Node::Skip,
            ]
        );
    }

    #[test]
    fn calc_over_constants() {
        let nodes = parse(&tokens(&[
            (VariableBegin, "{{"),
            (Integer, "1"),
            (Add, "+"),
            (Integer, "2"),
            (VariableEnd, "}}"),
        ]))
        .unwrap();
        assert_eq!(
            nodes[2],
            Node::Calc {
                op: Op::Add,
                left: Box::new(Node::Const(1)),
                right: Box::new(Node::Const(2)),
            }
        );
    }

    #[test]
    fn calc_folds_left_without_precedence() {
        let nodes = parse(&tokens(&[
            (VariableBegin, "{{"),
            (Integer, "1"),
            (Add, "+"),
            (Integer, "2"),
            (Sub, "-"),
            (Integer, "3"),
            (VariableEnd, "}}"),
        ]))
        .unwrap();
        assert_eq!(
            nodes[2],
            Node::Calc {
                op: Op::Sub,
                left: Box::new(Node::Calc {
                    op: Op::Add,
                    left: Box::new(Node::Const(1)),
                    right: Box::new(Node::Const(2)),
                }),
                right: Box::new(Node::Const(3)),
            }
        );
    }

    #[test]
    fn calc_over_accessor_operands() {
        let nodes = parse(&tokens(&[
            (VariableBegin, "{{"),
            (Name, "base"),
            (Add, "+"),
            (Name, "extra"),
            (LBracket, "["),
            (Integer, "1"),
            (RBracket, "]"),
            (VariableEnd, "}}"),
        ]))
        .unwrap();
        assert_eq!(
            nodes[2],
            Node::Calc {
                op: Op::Add,
                left: Box::new(Node::Name("base".to_owned())),
                right: Box::new(Node::Get("extra".to_owned(), Index::Item(1))),
            }
        );
    }

    #[test]
    fn if_construct_collapses_to_one_node() {
        let nodes = parse(&tokens(&[
            (BlockBegin, "{%"),
            (Name, "if"),
            (Name, "show"),
            (BlockEnd, "%}"),
            (Data, "yes"),
            (BlockBegin, "{%"),
            (Name, "endif"),
            (BlockEnd, "%}"),
        ]))
        .unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Root,
                Node::If {
                    test: "show".to_owned(),
                    body: "yes".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn data_newlines_are_escaped() {
        let nodes = parse(&tokens(&[(Data, "a\nb")])).unwrap();
        assert_eq!(nodes[1], Node::Data("a\\nb".to_owned()));
    }

    #[test]
    fn operator_without_left_operand() {
        let result = parse(&tokens(&[(VariableBegin, "{{"), (Add, "+"), (Integer, "1")]));
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn bracket_without_close() {
        let result = parse(&tokens(&[
            (VariableBegin, "{{"),
            (Name, "dummy"),
            (LBracket, "["),
            (Integer, "0"),
            (VariableEnd, "}}"),
        ]));
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn dot_without_name() {
        let result = parse(&tokens(&[
            (VariableBegin, "{{"),
            (Name, "dummy"),
            (Dot, "."),
            (VariableEnd, "}}"),
        ]));
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn unknown_statement() {
        let result = parse(&tokens(&[
            (BlockBegin, "{%"),
            (Name, "for"),
            (Name, "x"),
            (BlockEnd, "%}"),
        ]));
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    fn tokens(parts: &[(TokenKind, &str)]) -> Vec<Token> {
        parts.iter()
            .map(|(kind, text)| Token::new(*kind, *text))
            .collect()
    }
}
