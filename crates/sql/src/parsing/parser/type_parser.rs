//! Type parser module
//!
//! Column types are written as identifiers (`long`, `string`, `geo_point`)
//! or as `array(inner)`.

use super::super::Token;
use super::token_helper::TokenHelper;
use crate::error::{Error, Result};
use crate::types::data_type::DataType;

/// Parser trait for type parsing functionality
pub trait TypeParser: TokenHelper {
    /// Parse a data type (recursive for array element types)
    fn parse_type(&mut self) -> Result<DataType> {
        let name = self.next_ident()?;
        if name == "array" {
            self.expect(Token::OpenParen)?;
            let inner = self.parse_type()?;
            self.expect(Token::CloseParen)?;
            return Ok(DataType::Array(Box::new(inner)));
        }
        DataType::from_name(&name)
            .ok_or_else(|| Error::ParseError(format!("unknown data type {}", name)))
    }
}
