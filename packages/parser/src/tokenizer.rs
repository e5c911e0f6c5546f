use logos::Logos;
use std::fmt;

/// Token types for typed-schema declaration text
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token<'src> {
    // Keywords
    #[token("interface")]
    Interface,

    #[token("type")]
    Type,

    #[token("enum")]
    Enum,

    #[token("extends")]
    Extends,

    #[token("readonly")]
    Readonly,

    // Doc comments are captured rather than skipped so box and
    // property comments survive a parse
    #[regex(r"/\*\*([^*]|\*[^/])*\*/", |lex| lex.slice())]
    DocComment(&'src str),

    // Identifiers
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    // Symbols
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("?")]
    Question,

    #[token("=")]
    Equals,

    #[token("|")]
    Pipe,

    #[token("&")]
    Ampersand,

    #[token(".")]
    Dot,
}

impl<'src> Token<'src> {
    /// Identifier-like text of this token. Keywords double as plain
    /// member names inside declaration bodies.
    pub fn ident_text(&self) -> Option<&'src str> {
        match self {
            Token::Ident(s) => Some(s),
            Token::Interface => Some("interface"),
            Token::Type => Some("type"),
            Token::Enum => Some("enum"),
            Token::Extends => Some("extends"),
            Token::Readonly => Some("readonly"),
            _ => None,
        }
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Interface => write!(f, "interface"),
            Token::Type => write!(f, "type"),
            Token::Enum => write!(f, "enum"),
            Token::Extends => write!(f, "extends"),
            Token::Readonly => write!(f, "readonly"),
            Token::DocComment(_) => write!(f, "doc comment"),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LAngle => write!(f, "<"),
            Token::RAngle => write!(f, ">"),
            Token::Colon => write!(f, ":"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Question => write!(f, "?"),
            Token::Equals => write!(f, "="),
            Token::Pipe => write!(f, "|"),
            Token::Ampersand => write!(f, "&"),
            Token::Dot => write!(f, "."),
        }
    }
}

/// Tokenize a source string, keeping byte spans so callers can slice
/// raw type-expression text back out of the input
pub fn tokenize(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}
