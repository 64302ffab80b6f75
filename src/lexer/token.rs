#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number(f64),
    String,
    Identifier,

    // Keywords
    Let,
    Print,
    Function,
    If,
    Else,
    While,
    Return,
    Class,
    Extends,
    New,
    This,

    // Operators
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Equal,        // =
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=

    // Delimiters
    Dot,       // .
    Semicolon, // ;
    Comma,     // ,
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }

    Unknown,
    EOF,
}

impl TokenKind {
    pub fn keyword(ident: &str) -> Option<Self> {
        let kind = match ident {
            "let" => Self::Let,
            "print" => Self::Print,
            "function" => Self::Function,
            "if" => Self::If,
            "else" => Self::Else,
            "while" => Self::While,
            "return" => Self::Return,
            "class" => Self::Class,
            "extends" => Self::Extends,
            "new" => Self::New,
            "this" => Self::This,
            _ => return None,
        };
        Some(kind)
    }
}

/// A lexeme together with its classification.
///
/// `lexeme` borrows from the source: for string literals it is the text
/// between the quotes, for the end sentinel it is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::EOF)
    }

    /// Human-readable description used in parser diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EOF => "end of input".to_string(),
            TokenKind::String => format!("string \"{}\"", self.lexeme),
            _ => format!("'{}'", self.lexeme),
        }
    }
}
