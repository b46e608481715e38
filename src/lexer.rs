use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Data,
    Name,
    VariableBegin,
    VariableEnd,
    BlockBegin,
    BlockEnd,
    LBracket,
    RBracket,
    Integer,
    Str,
    Dot,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// One element of the flat token sequence. Equality is structural,
/// kind plus text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }
}

/// Scans `source` into an ordered token sequence.
///
/// Literal text between markers accumulates into `Data` tokens; `{{`
/// and `{%` switch to marker-specific scanning. A marker that cannot
/// be completed where expected fails with [Error::Syntax].
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    // toggled after each `{% %}` marker: opening statements carry a
    // keyword and a subject, closing statements a keyword only
    in_block: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            in_block: false,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, Error> {
        let mut text = String::new();
        while self.pos < self.input.len() {
            if self.eat("{{") {
                self.flush(&mut text);
                self.push(TokenKind::VariableBegin, "{{");
                self.variable_block()?;
            } else if self.eat("{%") {
                self.flush(&mut text);
                self.push(TokenKind::BlockBegin, "{%");
                self.statement_block()?;
            } else {
                let c = self.rest().chars().next().unwrap();
                text.push(c);
                self.pos += c.len_utf8();
            }
        }
        self.flush(&mut text);
        Ok(self.tokens)
    }

    /// `{{` has been consumed: primary operand, an optional operator
    /// chain, then the closing `}}`.
    fn variable_block(&mut self) -> Result<(), Error> {
        self.skip_spaces();
        self.operand()?;
        loop {
            self.skip_spaces();
            if self.eat("}}") {
                self.push(TokenKind::VariableEnd, "}}");
                return Ok(());
            }
            self.operator()?;
            self.skip_spaces();
            self.operand()?;
        }
    }

    /// `{%` has been consumed: keyword, subject when opening, then the
    /// closing `%}`.
    fn statement_block(&mut self) -> Result<(), Error> {
        self.skip_spaces();
        let keyword = self
            .name()
            .ok_or_else(|| syntax("expected a statement keyword after `{%`"))?;
        self.push(TokenKind::Name, keyword);
        if !self.in_block {
            self.skip_spaces();
            if let Some(subject) = self.name() {
                self.push(TokenKind::Name, subject);
            } else if let Some(digits) = self.integer() {
                self.push(TokenKind::Integer, digits);
            } else {
                return Err(syntax("expected a test subject after the statement keyword"));
            }
        }
        self.skip_spaces();
        if !self.eat("%}") {
            return Err(syntax("missing `%}`"));
        }
        self.push(TokenKind::BlockEnd, "%}");
        self.in_block = !self.in_block;
        Ok(())
    }

    /// A name with at most one accessor, or an integer literal.
    fn operand(&mut self) -> Result<(), Error> {
        if let Some(name) = self.name() {
            self.push(TokenKind::Name, name);
            self.accessor()?;
        } else if let Some(digits) = self.integer() {
            self.push(TokenKind::Integer, digits);
        } else {
            return Err(syntax("expected a name or integer"));
        }
        Ok(())
    }

    /// `[` integer-or-quoted-string `]`, or `.` name.
    fn accessor(&mut self) -> Result<(), Error> {
        if self.eat("[") {
            self.push(TokenKind::LBracket, "[");
            if let Some(digits) = self.integer() {
                self.push(TokenKind::Integer, digits);
            } else if let Some(value) = self.quoted()? {
                self.push(TokenKind::Str, value);
            } else {
                return Err(syntax("expected an integer or quoted string after `[`"));
            }
            if !self.eat("]") {
                return Err(syntax("missing `]`"));
            }
            self.push(TokenKind::RBracket, "]");
        } else if self.eat(".") {
            self.push(TokenKind::Dot, ".");
            match self.name() {
                Some(name) => self.push(TokenKind::Name, name),
                None => return Err(syntax("expected a name after `.`")),
            }
        }
        Ok(())
    }

    fn operator(&mut self) -> Result<(), Error> {
        let kind = match self.rest().chars().next() {
            Some('+') => TokenKind::Add,
            Some('-') => TokenKind::Sub,
            Some('*') => TokenKind::Mul,
            Some('/') => TokenKind::Div,
            Some('%') => TokenKind::Mod,
            _ => return Err(syntax("missing `}}`")),
        };
        let text = &self.rest()[..1];
        self.push(kind, text);
        self.pos += 1;
        Ok(())
    }

    /// `[a-zA-Z_][a-zA-Z0-9_]*`, or None if the cursor is not on one.
    fn name(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let mut len = 0;
        for c in rest.chars() {
            let matched = if len == 0 {
                c.is_ascii_alphabetic() || c == '_'
            } else {
                c.is_ascii_alphanumeric() || c == '_'
            };
            if !matched {
                break;
            }
            len += c.len_utf8();
        }
        if len == 0 {
            None
        } else {
            self.pos += len;
            Some(&rest[..len])
        }
    }

    /// `[0-9]+`, or None if the cursor is not on a digit.
    fn integer(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            None
        } else {
            self.pos += len;
            Some(&rest[..len])
        }
    }

    /// A single- or double-quoted string; the returned value has the
    /// quotes stripped. Ok(None) if the cursor is not on a quote.
    fn quoted(&mut self) -> Result<Option<&'a str>, Error> {
        let rest = self.rest();
        let quote = match rest.chars().next() {
            Some(c @ ('\'' | '"')) => c,
            _ => return Ok(None),
        };
        match rest[1..].find(quote) {
            Some(end) => {
                let value = &rest[1..1 + end];
                self.pos += end + 2;
                Ok(Some(value))
            }
            None => Err(syntax("unterminated quoted string")),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn eat(&mut self, pattern: &str) -> bool {
        if self.rest().starts_with(pattern) {
            self.pos += pattern.len();
            true
        } else {
            false
        }
    }

    fn skip_spaces(&mut self) {
        while self.rest().starts_with(' ') {
            self.pos += 1;
        }
    }

    fn flush(&mut self, text: &mut String) {
        if !text.is_empty() {
            let data = std::mem::take(text);
            self.tokens.push(Token::new(TokenKind::Data, data));
        }
    }

    fn push(&mut self, kind: TokenKind, text: &str) {
        self.tokens.push(Token::new(kind, text));
    }
}

fn syntax(message: &str) -> Error {
    Error::Syntax(message.to_owned())
}
