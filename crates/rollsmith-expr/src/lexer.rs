//! Token definitions and the logos-backed lexer.

use logos::Logos;
use std::fmt;

use crate::error::{ExprError, ExprResult};

/// A single expression token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    /// Numeric literal, always lexed as `f64`.
    #[regex(r"([0-9]+(\.[0-9]*)?)|(\.[0-9]+)", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// Parameter name.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// Left parenthesis `(`.
    #[token("(")]
    LParen,
    /// Right parenthesis `)`.
    #[token(")")]
    RParen,

    /// Equality `==`.
    #[token("==")]
    EqEq,
    /// Inequality `!=`.
    #[token("!=")]
    BangEq,
    /// Less-or-equal `<=`.
    #[token("<=")]
    Le,
    /// Greater-or-equal `>=`.
    #[token(">=")]
    Ge,
    /// Less-than `<`.
    #[token("<")]
    Lt,
    /// Greater-than `>`.
    #[token(">")]
    Gt,

    /// Logical and `&&`.
    #[token("&&")]
    AndAnd,
    /// Logical or `||`.
    #[token("||")]
    OrOr,
    /// Logical not `!`.
    #[token("!")]
    Bang,

    /// Addition `+`.
    #[token("+")]
    Plus,
    /// Subtraction or negation `-`.
    #[token("-")]
    Minus,
    /// Multiplication `*`.
    #[token("*")]
    Star,
    /// Division `/`.
    #[token("/")]
    Slash,
    /// Modulo `%`.
    #[token("%")]
    Percent,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::EqEq => write!(f, "=="),
            Token::BangEq => write!(f, "!="),
            Token::Le => write!(f, "<="),
            Token::Ge => write!(f, ">="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::Bang => write!(f, "!"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
        }
    }
}

/// Lex `source` into a token stream, failing on the first bad character.
pub fn lex(source: &str) -> ExprResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => return Err(ExprError::UnexpectedChar(lexer.span().start)),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_numbers_and_idents() {
        let tokens = lex("3.5 + Gold").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(3.5),
                Token::Plus,
                Token::Ident("Gold".to_string()),
            ]
        );
    }

    #[test]
    fn lex_multichar_operators() {
        let tokens = lex("<= >= == != && ||").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Le,
                Token::Ge,
                Token::EqEq,
                Token::BangEq,
                Token::AndAnd,
                Token::OrOr,
            ]
        );
    }

    #[test]
    fn lex_rejects_stray_characters() {
        assert_eq!(lex("2 @ 2"), Err(ExprError::UnexpectedChar(2)));
    }
}
