use std::{iter::Peekable, str::CharIndices};

pub mod error;
pub mod token;

pub use error::{LexError, LexResult};
pub use token::{Span, Token, TokenKind};

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    eof_reached: bool,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            eof_reached: false,
            line: 1,
            column: 0,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token<'a>> {
        self.skip_trivia();

        let Some(&(start, ch)) = self.chars.peek() else {
            self.eof_reached = true;
            let index = self.input.len();
            return Ok(Token::new(
                TokenKind::EOF,
                "",
                Span {
                    start: index,
                    end: index,
                    line: self.line,
                    column: self.column,
                },
            ));
        };

        let line = self.line;
        let column = self.column;
        match ch {
            '"' => self.read_string(start, line, column),
            c if c.is_ascii_digit() => Ok(self.read_number(start, line, column)),
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.read_identifier(start, line, column)),
            '<' | '>' => {
                self.advance_char();
                let kind = match (ch, self.peek_char()) {
                    ('<', Some('=')) => TokenKind::LessEqual,
                    ('>', Some('=')) => TokenKind::GreaterEqual,
                    ('<', _) => TokenKind::Less,
                    _ => TokenKind::Greater,
                };
                if matches!(kind, TokenKind::LessEqual | TokenKind::GreaterEqual) {
                    self.advance_char();
                }
                Ok(self.make_token(kind, start, line, column))
            }
            _ => {
                let kind = match ch {
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '=' => TokenKind::Equal,
                    '.' => TokenKind::Dot,
                    ';' => TokenKind::Semicolon,
                    ',' => TokenKind::Comma,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    // Left for the parser to reject.
                    _ => TokenKind::Unknown,
                };
                self.advance_char();
                Ok(self.make_token(kind, start, line, column))
            }
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(&(idx, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.advance_char();
            } else if c == '/' && self.input[idx + 1..].starts_with('/') {
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance_char();
                }
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        self.advance_char(); // Consume first char
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance_char();
            } else {
                break;
            }
        }

        let end = self.current_index();
        let ident = &self.input[start..end];
        let kind = TokenKind::keyword(ident).unwrap_or(TokenKind::Identifier);
        Token::new(
            kind,
            ident,
            Span {
                start,
                end,
                line,
                column,
            },
        )
    }

    fn read_number(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        self.consume_digits();

        // A fraction needs at least one digit after the dot; `1.` lexes as `1` then `.`.
        if self.peek_char() == Some('.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if lookahead.peek().is_some_and(|&(_, c)| c.is_ascii_digit()) {
                self.advance_char();
                self.consume_digits();
            }
        }

        let end = self.current_index();
        let literal = &self.input[start..end];
        // `digits[.digits]` is always a valid float literal.
        let value = literal.parse::<f64>().unwrap_or_default();
        Token::new(
            TokenKind::Number(value),
            literal,
            Span {
                start,
                end,
                line,
                column,
            },
        )
    }

    fn read_string(&mut self, start: usize, line: usize, column: usize) -> LexResult<Token<'a>> {
        self.advance_char(); // Consume opening quote
        let content_start = start + 1;
        while let Some(&(idx, c)) = self.chars.peek() {
            if c == '"' {
                self.advance_char(); // Consume closing quote
                return Ok(Token::new(
                    TokenKind::String,
                    &self.input[content_start..idx],
                    Span {
                        start,
                        end: idx + 1,
                        line,
                        column,
                    },
                ));
            }
            self.advance_char();
        }
        Err(LexError::UnterminatedString { line, column })
    }

    fn consume_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance_char();
        }
    }

    fn make_token(&mut self, kind: TokenKind, start: usize, line: usize, column: usize) -> Token<'a> {
        let end = self.current_index();
        Token::new(
            kind,
            &self.input[start..end],
            Span {
                start,
                end,
                line,
                column,
            },
        )
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof_reached {
            return None;
        }
        Some(self.next_token())
    }
}

impl<'a> Lexer<'a> {
    fn advance_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

/// Lexes the whole input eagerly. The result always ends with a single
/// [`TokenKind::EOF`] token.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = input.len()))]
pub fn tokenize(input: &str) -> LexResult<Vec<Token<'_>>> {
    let tokens = Lexer::new(input).collect::<LexResult<Vec<_>>>()?;
    tracing::debug!(count = tokens.len(), "tokenized");
    Ok(tokens)
}
