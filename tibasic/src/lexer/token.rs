//! Token definitions

use logos::{Lexer, Logos};

/// Calculator dialect token
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    // Commands
    #[token("Disp")]
    Disp,
    #[token("Prompt")]
    Prompt,
    #[token("Input")]
    Input,
    #[token("If")]
    If,
    #[token("Then")]
    Then,
    #[token("Else")]
    Else,
    #[token("End")]
    End,
    #[token("While")]
    While,
    #[token("For(")]
    For,
    #[token("Stop")]
    Stop,

    // Jumps carry their label name
    #[regex(r"Lbl[ \t]*[A-Z0-9]+", |lex| operand(lex, "Lbl"))]
    Lbl(String),
    #[regex(r"Goto[ \t]*[A-Z0-9]+", |lex| operand(lex, "Goto"))]
    Goto(String),

    // Logical operators
    #[token("and")]
    And,
    #[token("or")]
    Or,

    // Variables
    /// Number variable: a single uppercase letter
    #[regex("[A-Z]", |lex| lex.slice().to_string())]
    Var(String),
    /// Built-in list, normalized to subscript digits
    #[regex("L[₁₂₃₄₅₆1-6]", list_name)]
    ListVar(String),
    /// User-named list: `⌊NAME`
    #[regex("⌊[A-Z][A-Z0-9]*", |lex| lex.slice().to_string())]
    CustomList(String),

    // Literals
    #[regex(r"[0-9]+(\.[0-9]*)?|\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
    #[regex(r#""[^"\n]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Str(String),

    // Store
    #[token("→")]
    #[token("->")]
    Store,

    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,

    // Comparison
    #[token("=")]
    Eq,
    #[token("≠")]
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token("≤")]
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token("≥")]
    #[token(">=")]
    Ge,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,

    /// Statement separator: newline or `:`
    #[token("\n")]
    #[token(":")]
    Eol,
}

fn operand(lex: &mut Lexer<Token>, keyword: &str) -> String {
    lex.slice()[keyword.len()..].trim_start().to_string()
}

fn list_name(lex: &mut Lexer<Token>) -> String {
    let digit = match lex.slice().chars().nth(1) {
        Some('1' | '₁') => '₁',
        Some('2' | '₂') => '₂',
        Some('3' | '₃') => '₃',
        Some('4' | '₄') => '₄',
        Some('5' | '₅') => '₅',
        _ => '₆',
    };
    format!("L{digit}")
}

impl Token {
    /// Human-readable form for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Token::Disp => "`Disp`".into(),
            Token::Prompt => "`Prompt`".into(),
            Token::Input => "`Input`".into(),
            Token::If => "`If`".into(),
            Token::Then => "`Then`".into(),
            Token::Else => "`Else`".into(),
            Token::End => "`End`".into(),
            Token::While => "`While`".into(),
            Token::For => "`For(`".into(),
            Token::Stop => "`Stop`".into(),
            Token::Lbl(name) => format!("`Lbl {name}`"),
            Token::Goto(name) => format!("`Goto {name}`"),
            Token::And => "`and`".into(),
            Token::Or => "`or`".into(),
            Token::Var(name) | Token::ListVar(name) | Token::CustomList(name) => {
                format!("variable `{name}`")
            }
            Token::Number(n) => format!("number `{n}`"),
            Token::Str(s) => format!("string \"{s}\""),
            Token::Store => "`→`".into(),
            Token::Plus => "`+`".into(),
            Token::Minus => "`-`".into(),
            Token::Star => "`*`".into(),
            Token::Slash => "`/`".into(),
            Token::Caret => "`^`".into(),
            Token::Eq => "`=`".into(),
            Token::Ne => "`≠`".into(),
            Token::Lt => "`<`".into(),
            Token::Le => "`≤`".into(),
            Token::Gt => "`>`".into(),
            Token::Ge => "`≥`".into(),
            Token::LParen => "`(`".into(),
            Token::RParen => "`)`".into(),
            Token::LBrace => "`{`".into(),
            Token::RBrace => "`}`".into(),
            Token::Comma => "`,`".into(),
            Token::Eol => "end of statement".into(),
        }
    }
}
