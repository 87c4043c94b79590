//! Token helper module
//!
//! Token navigation shared by every parser trait.

use super::super::{Keyword, Token};
use crate::error::{Error, Result};

/// Base trait for token navigation. All other parser traits extend it.
pub trait TokenHelper {
    /// Fetches the next lexer token, or errors if none is found.
    fn next(&mut self) -> Result<Token>;

    /// Peeks the next lexer token if any, without consuming it.
    fn peek(&mut self) -> Result<Option<&Token>>;

    /// Returns the next identifier, or errors if not found.
    fn next_ident(&mut self) -> Result<String> {
        match self.next()? {
            Token::Ident(ident) => Ok(ident),
            token => Err(Error::ParseError(format!(
                "expected identifier, found {}",
                token
            ))),
        }
    }

    /// Returns the next identifier or keyword as identifier, for property
    /// paths where keywords are legal segments (e.g. `blocks.read_only`).
    fn next_ident_or_keyword(&mut self) -> Result<String> {
        match self.next()? {
            Token::Ident(ident) => Ok(ident),
            Token::Keyword(keyword) => Ok(keyword.to_string().to_lowercase()),
            token => Err(Error::ParseError(format!(
                "expected identifier or keyword, found {}",
                token
            ))),
        }
    }

    /// Returns the next lexer token if it satisfies the predicate.
    fn next_if(&mut self, predicate: impl Fn(&Token) -> bool) -> Option<Token> {
        self.peek().ok()?.filter(|&t| predicate(t))?;
        self.next().ok()
    }

    /// Consumes the next lexer token if it is the given token, returning true.
    fn next_is(&mut self, token: Token) -> bool {
        self.next_if(|t| t == &token).is_some()
    }

    /// Consumes the next lexer token if it's the expected token, or errors.
    fn expect(&mut self, expect: Token) -> Result<()> {
        let token = self.next()?;
        if token != expect {
            return Err(Error::ParseError(format!(
                "expected {}, found {}",
                expect, token
            )));
        }
        Ok(())
    }

    /// Consumes the next lexer token if it is the given token.
    fn skip(&mut self, token: Token) {
        self.next_is(token);
    }

    /// Parses `keyword keyword ...` as a unit, e.g. IF NOT EXISTS. Returns
    /// false without consuming anything if the first keyword is absent.
    fn next_is_keywords(&mut self, keywords: &[Keyword]) -> Result<bool> {
        let Some((first, rest)) = keywords.split_first() else {
            return Ok(false);
        };
        if !self.next_is((*first).into()) {
            return Ok(false);
        }
        for keyword in rest {
            self.expect((*keyword).into())?;
        }
        Ok(true)
    }
}
