//! DDL (Data Definition Language) statement parser module
//!
//! Handles CREATE [BLOB] TABLE, DROP [BLOB] TABLE and ALTER [BLOB] TABLE.

use super::super::{Keyword, Token};
use super::expr_parser::ExpressionParser;
use super::type_parser::TypeParser;
use crate::error::{Error, Result};
use crate::parsing::ast::{
    AlterOperation, ClusteredBy, Column, DdlStatement, Expression, GenericProperties, IndexMethod,
    Statement, TableName,
};

/// Parser trait for DDL statements
pub trait DdlParser: TypeParser + ExpressionParser {
    /// Parses a CREATE statement.
    fn parse_create(&mut self) -> Result<Statement> {
        self.expect(Keyword::Create.into())?;
        let blob = self.next_is(Keyword::Blob.into());
        self.expect(Keyword::Table.into())?;
        let if_not_exists = self.next_is_keywords(&[Keyword::If, Keyword::Not, Keyword::Exists])?;
        let name = self.parse_table_name()?;
        if blob {
            self.parse_create_blob_table_inner(name, if_not_exists)
        } else {
            self.parse_create_table_inner(name, if_not_exists)
        }
    }

    /// Parses the remainder of CREATE TABLE after the table name.
    fn parse_create_table_inner(&mut self, name: TableName, if_not_exists: bool) -> Result<Statement> {
        self.expect(Token::OpenParen)?;
        let mut columns = Vec::new();
        let mut primary_key = Vec::new();
        loop {
            if self.next_is_keywords(&[Keyword::Primary, Keyword::Key])? {
                primary_key.extend(self.parse_column_list()?);
            } else {
                columns.push(self.parse_column()?);
            }
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        self.expect(Token::CloseParen)?;

        let mut clustered = None;
        let mut partitioned_by = None;
        loop {
            if self.next_is(Keyword::Clustered.into()) {
                if clustered.is_some() {
                    return Err(Error::ParseError("CLUSTERED specified more than once".into()));
                }
                clustered = Some(self.parse_clustered_inner(true)?);
            } else if self.next_is_keywords(&[Keyword::Partitioned, Keyword::By])? {
                if partitioned_by.is_some() {
                    return Err(Error::ParseError(
                        "PARTITIONED BY specified more than once".into(),
                    ));
                }
                partitioned_by = Some(self.parse_column_list()?);
            } else {
                break;
            }
        }
        let properties = self.parse_with_properties()?;

        Ok(Statement::Ddl(DdlStatement::CreateTable {
            name,
            columns,
            primary_key,
            clustered,
            partitioned_by: partitioned_by.unwrap_or_default(),
            properties,
            if_not_exists,
        }))
    }

    /// Parses the remainder of CREATE BLOB TABLE after the table name.
    fn parse_create_blob_table_inner(
        &mut self,
        name: TableName,
        if_not_exists: bool,
    ) -> Result<Statement> {
        let number_of_shards = if self.next_is(Keyword::Clustered.into()) {
            self.parse_clustered_inner(false)?.number_of_shards
        } else {
            None
        };
        let properties = self.parse_with_properties()?;
        Ok(Statement::Ddl(DdlStatement::CreateBlobTable {
            name,
            number_of_shards,
            properties,
            if_not_exists,
        }))
    }

    /// Parses `[BY (column)] [INTO n SHARDS]` after CLUSTERED.
    fn parse_clustered_inner(&mut self, allow_by: bool) -> Result<ClusteredBy> {
        let mut clustered = ClusteredBy::default();
        if allow_by && self.next_is(Keyword::By.into()) {
            self.expect(Token::OpenParen)?;
            clustered.column = Some(self.parse_column_ref()?);
            self.expect(Token::CloseParen)?;
        }
        if self.next_is(Keyword::Into.into()) {
            clustered.number_of_shards = Some(self.parse_expression()?);
            self.expect(Keyword::Shards.into())?;
        }
        if clustered.column.is_none() && clustered.number_of_shards.is_none() {
            return Err(Error::ParseError(
                "expected BY or INTO after CLUSTERED".into(),
            ));
        }
        Ok(clustered)
    }

    /// Parses a DROP [BLOB] TABLE statement.
    fn parse_drop(&mut self) -> Result<Statement> {
        self.expect(Keyword::Drop.into())?;
        let blob = self.next_is(Keyword::Blob.into());
        self.expect(Keyword::Table.into())?;
        let if_exists = self.next_is_keywords(&[Keyword::If, Keyword::Exists])?;
        let name = self.parse_table_name()?;
        Ok(Statement::Ddl(DdlStatement::DropTable {
            name,
            blob,
            if_exists,
        }))
    }

    /// Parses an ALTER [BLOB] TABLE statement.
    fn parse_alter(&mut self) -> Result<Statement> {
        self.expect(Keyword::Alter.into())?;
        let blob = self.next_is(Keyword::Blob.into());
        self.expect(Keyword::Table.into())?;
        let only = !blob && self.next_is(Keyword::Only.into());
        let name = self.parse_table_name()?;

        let partition = if !blob && self.next_is(Keyword::Partition.into()) {
            self.expect(Token::OpenParen)?;
            let mut assignments = Vec::new();
            loop {
                let column = self.parse_column_ref()?;
                self.expect(Token::Equal)?;
                assignments.push((column, self.parse_expression()?));
                if !self.next_is(Token::Comma) {
                    break;
                }
            }
            self.expect(Token::CloseParen)?;
            Some(assignments)
        } else {
            None
        };

        let operation = match self.next()? {
            Token::Keyword(Keyword::Set) => AlterOperation::Set(self.parse_properties()?),
            Token::Keyword(Keyword::Reset) => {
                self.expect(Token::OpenParen)?;
                let mut names = Vec::new();
                loop {
                    names.push(self.parse_property_name()?);
                    if !self.next_is(Token::Comma) {
                        break;
                    }
                }
                self.expect(Token::CloseParen)?;
                AlterOperation::Reset(names)
            }
            token => {
                return Err(Error::ParseError(format!(
                    "expected SET or RESET, found {}",
                    token
                )));
            }
        };

        Ok(Statement::Ddl(DdlStatement::AlterTable {
            name,
            blob,
            only,
            partition,
            operation,
        }))
    }

    /// Parses `ident [. ident]`. A keyword is accepted as the schema part, so
    /// `blob.myblobs` needs no quoting.
    fn parse_table_name(&mut self) -> Result<TableName> {
        let first = match self.next()? {
            Token::Ident(ident) => ident,
            Token::Keyword(keyword) if self.peek()? == Some(&Token::Period) => {
                keyword.to_string().to_lowercase()
            }
            token => {
                return Err(Error::ParseError(format!(
                    "expected table name, found {}",
                    token
                )));
            }
        };
        if self.next_is(Token::Period) {
            let name = self.next_ident()?;
            if self.peek()? == Some(&Token::Period) {
                return Err(Error::ParseError(format!(
                    "table name {}.{} has too many parts",
                    first, name
                )));
            }
            return Ok(TableName {
                schema: Some(first),
                name,
            });
        }
        Ok(TableName {
            schema: None,
            name: first,
        })
    }

    /// Parses a column definition.
    fn parse_column(&mut self) -> Result<Column> {
        let name = self.next_ident()?;
        let datatype = self.parse_type()?;
        let mut column = Column {
            name,
            datatype,
            primary_key: false,
            index: IndexMethod::Plain,
        };
        loop {
            if self.next_is_keywords(&[Keyword::Primary, Keyword::Key])? {
                column.primary_key = true;
            } else if self.next_is(Keyword::Index.into()) {
                column.index = if self.next_is(Keyword::Off.into()) {
                    IndexMethod::Off
                } else {
                    self.expect(Keyword::Using.into())?;
                    match self.next_ident()?.as_str() {
                        "plain" => IndexMethod::Plain,
                        "fulltext" => IndexMethod::Fulltext,
                        other => {
                            return Err(Error::ParseError(format!(
                                "unknown index method {}",
                                other
                            )));
                        }
                    }
                };
            } else {
                break;
            }
        }
        Ok(column)
    }

    /// Parses a column reference: `ident (. ident | ['key'])*`, joined by dots.
    fn parse_column_ref(&mut self) -> Result<String> {
        let mut path = self.next_ident()?;
        loop {
            if self.next_is(Token::Period) {
                path.push('.');
                path.push_str(&self.next_ident()?);
            } else if self.next_is(Token::OpenBracket) {
                match self.next()? {
                    Token::String(key) => {
                        path.push('.');
                        path.push_str(&key);
                    }
                    token => {
                        return Err(Error::ParseError(format!(
                            "expected string subscript, found {}",
                            token
                        )));
                    }
                }
                self.expect(Token::CloseBracket)?;
            } else {
                return Ok(path);
            }
        }
    }

    /// Parses `( column [, ...] )`.
    fn parse_column_list(&mut self) -> Result<Vec<String>> {
        self.expect(Token::OpenParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_ref()?);
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        self.expect(Token::CloseParen)?;
        Ok(columns)
    }

    /// Parses an optional `WITH ( ... )` clause.
    fn parse_with_properties(&mut self) -> Result<GenericProperties> {
        if self.next_is(Keyword::With.into()) {
            self.parse_properties()
        } else {
            Ok(GenericProperties::new())
        }
    }

    /// Parses `( name = value [, ...] )`. Duplicate names are rejected.
    fn parse_properties(&mut self) -> Result<GenericProperties> {
        self.expect(Token::OpenParen)?;
        let mut properties = GenericProperties::new();
        loop {
            let name = self.parse_property_name()?;
            self.expect(Token::Equal)?;
            let value: Expression = self.parse_expression()?;
            if properties.insert(name.clone(), value).is_some() {
                return Err(Error::ParseError(format!(
                    "property '{}' specified more than once",
                    name
                )));
            }
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        self.expect(Token::CloseParen)?;
        Ok(properties)
    }

    /// Parses a dotted property name such as `blocks.read_only`.
    fn parse_property_name(&mut self) -> Result<String> {
        let mut name = self.next_ident_or_keyword()?;
        while self.next_is(Token::Period) {
            name.push('.');
            name.push_str(&self.next_ident_or_keyword()?);
        }
        Ok(name)
    }
}
