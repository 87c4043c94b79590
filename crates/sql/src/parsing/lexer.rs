//! SQL lexer for the DDL dialect.
//!
//! Unquoted identifiers are folded to lowercase, double-quoted identifiers are
//! taken verbatim (so `"blob.s"` is a single identifier), and string literals
//! use single quotes with `''` as the escape for a quote.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Error, Result};

/// A lexical token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A numeric literal, kept as written.
    Number(String),
    /// A single-quoted string literal, unescaped.
    String(String),
    /// An identifier, lowercased unless it was quoted.
    Ident(String),
    Keyword(Keyword),
    Period,
    Comma,
    Semicolon,
    Equal,
    Minus,
    Plus,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    /// `?` positional placeholder.
    Question,
    /// `$n` numbered placeholder, 1-based as written.
    Placeholder(usize),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => f.write_str(n),
            Token::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Token::Ident(s) => write!(f, "\"{}\"", s),
            Token::Keyword(k) => write!(f, "{}", k),
            Token::Period => f.write_str("."),
            Token::Comma => f.write_str(","),
            Token::Semicolon => f.write_str(";"),
            Token::Equal => f.write_str("="),
            Token::Minus => f.write_str("-"),
            Token::Plus => f.write_str("+"),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::OpenBracket => f.write_str("["),
            Token::CloseBracket => f.write_str("]"),
            Token::Question => f.write_str("?"),
            Token::Placeholder(n) => write!(f, "${}", n),
        }
    }
}

impl From<Keyword> for Token {
    fn from(keyword: Keyword) -> Self {
        Token::Keyword(keyword)
    }
}

/// Reserved keywords. Everything else lexes as an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Alter,
    Blob,
    By,
    Clustered,
    Create,
    Drop,
    Exists,
    False,
    If,
    Index,
    Into,
    Key,
    Not,
    Null,
    Off,
    Only,
    Partition,
    Partitioned,
    Primary,
    Reset,
    Set,
    Shards,
    Table,
    True,
    Using,
    With,
}

impl Keyword {
    pub fn from_str(ident: &str) -> Option<Self> {
        let keyword = match ident.to_uppercase().as_str() {
            "ALTER" => Self::Alter,
            "BLOB" => Self::Blob,
            "BY" => Self::By,
            "CLUSTERED" => Self::Clustered,
            "CREATE" => Self::Create,
            "DROP" => Self::Drop,
            "EXISTS" => Self::Exists,
            "FALSE" => Self::False,
            "IF" => Self::If,
            "INDEX" => Self::Index,
            "INTO" => Self::Into,
            "KEY" => Self::Key,
            "NOT" => Self::Not,
            "NULL" => Self::Null,
            "OFF" => Self::Off,
            "ONLY" => Self::Only,
            "PARTITION" => Self::Partition,
            "PARTITIONED" => Self::Partitioned,
            "PRIMARY" => Self::Primary,
            "RESET" => Self::Reset,
            "SET" => Self::Set,
            "SHARDS" => Self::Shards,
            "TABLE" => Self::Table,
            "TRUE" => Self::True,
            "USING" => Self::Using,
            "WITH" => Self::With,
            _ => return None,
        };
        Some(keyword)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Alter => "ALTER",
            Self::Blob => "BLOB",
            Self::By => "BY",
            Self::Clustered => "CLUSTERED",
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::Exists => "EXISTS",
            Self::False => "FALSE",
            Self::If => "IF",
            Self::Index => "INDEX",
            Self::Into => "INTO",
            Self::Key => "KEY",
            Self::Not => "NOT",
            Self::Null => "NULL",
            Self::Off => "OFF",
            Self::Only => "ONLY",
            Self::Partition => "PARTITION",
            Self::Partitioned => "PARTITIONED",
            Self::Primary => "PRIMARY",
            Self::Reset => "RESET",
            Self::Set => "SET",
            Self::Shards => "SHARDS",
            Self::Table => "TABLE",
            Self::True => "TRUE",
            Self::Using => "USING",
            Self::With => "WITH",
        };
        f.write_str(s)
    }
}

/// The lexer iterates over tokens of an input string.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        match self.scan() {
            Ok(Some(token)) => Some(Ok(token)),
            // Trailing characters that produced no token are an error.
            Ok(None) => self
                .chars
                .peek()
                .map(|c| Err(Error::ParseError(format!("unexpected character {}", c)))),
            Err(err) => Some(Err(err)),
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            chars: input.chars().peekable(),
        }
    }

    fn next_if(&mut self, predicate: impl Fn(char) -> bool) -> Option<char> {
        self.chars.peek().filter(|&&c| predicate(c))?;
        self.chars.next()
    }

    fn next_while(&mut self, predicate: impl Fn(char) -> bool) -> Option<String> {
        let mut value = None;
        while let Some(c) = self.next_if(&predicate) {
            value.get_or_insert_with(String::new).push(c)
        }
        value
    }

    fn skip_whitespace(&mut self) {
        self.next_while(|c| c.is_whitespace());
    }

    fn scan(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();
        match self.chars.peek() {
            Some('\'') => self.scan_string(),
            Some('"') => self.scan_quoted_ident(),
            Some('$') => self.scan_placeholder(),
            Some(c) if c.is_ascii_digit() => Ok(self.scan_number()),
            Some(c) if c.is_alphabetic() || *c == '_' => Ok(self.scan_ident_or_keyword()),
            Some(_) => Ok(self.scan_symbol()),
            None => Ok(None),
        }
    }

    fn scan_ident_or_keyword(&mut self) -> Option<Token> {
        let name = self.next_while(|c| c.is_alphanumeric() || c == '_')?;
        if let Some(keyword) = Keyword::from_str(&name) {
            return Some(Token::Keyword(keyword));
        }
        Some(Token::Ident(name.to_lowercase()))
    }

    fn scan_quoted_ident(&mut self) -> Result<Option<Token>> {
        if self.next_if(|c| c == '"').is_none() {
            return Ok(None);
        }
        let mut ident = String::new();
        loop {
            match self.chars.next() {
                Some('"') if self.next_if(|c| c == '"').is_some() => ident.push('"'),
                Some('"') => break,
                Some(c) => ident.push(c),
                None => return Err(Error::ParseError("unexpected end of quoted identifier".into())),
            }
        }
        Ok(Some(Token::Ident(ident)))
    }

    fn scan_number(&mut self) -> Option<Token> {
        let mut number = self.next_while(|c| c.is_ascii_digit())?;
        if let Some(sep) = self.next_if(|c| c == '.') {
            number.push(sep);
            while let Some(digit) = self.next_if(|c| c.is_ascii_digit()) {
                number.push(digit);
            }
        }
        Some(Token::Number(number))
    }

    fn scan_placeholder(&mut self) -> Result<Option<Token>> {
        if self.next_if(|c| c == '$').is_none() {
            return Ok(None);
        }
        let digits = self
            .next_while(|c| c.is_ascii_digit())
            .ok_or_else(|| Error::ParseError("expected digits after $".into()))?;
        let position: usize = digits
            .parse()
            .map_err(|_| Error::ParseError(format!("invalid placeholder ${}", digits)))?;
        if position == 0 {
            return Err(Error::ParseError("placeholder positions start at $1".into()));
        }
        Ok(Some(Token::Placeholder(position)))
    }

    fn scan_string(&mut self) -> Result<Option<Token>> {
        if self.next_if(|c| c == '\'').is_none() {
            return Ok(None);
        }
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some('\'') if self.next_if(|c| c == '\'').is_some() => s.push('\''),
                Some('\'') => break,
                Some(c) => s.push(c),
                None => return Err(Error::ParseError("unexpected end of string literal".into())),
            }
        }
        Ok(Some(Token::String(s)))
    }

    fn scan_symbol(&mut self) -> Option<Token> {
        let token = match self.chars.peek()? {
            '.' => Token::Period,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '=' => Token::Equal,
            '-' => Token::Minus,
            '+' => Token::Plus,
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '[' => Token::OpenBracket,
            ']' => Token::CloseBracket,
            '?' => Token::Question,
            _ => return None,
        };
        self.chars.next();
        Some(token)
    }
}
