//! Modular SQL parser implementation
//!
//! The parser is split into several modules:
//! - ddl_parser: CREATE, DROP and ALTER statements
//! - expr_parser: value expressions (literals, placeholders, arrays)
//! - literal_parser: literal values
//! - type_parser: column data types
//! - token_helper: base trait for token navigation

pub mod ddl_parser;
pub mod expr_parser;
pub mod literal_parser;
pub mod token_helper;
pub mod type_parser;

use std::iter::Peekable;

use self::ddl_parser::DdlParser;
use self::expr_parser::ExpressionParser;
use self::literal_parser::LiteralParser;
use self::token_helper::TokenHelper;
use self::type_parser::TypeParser;
use super::ast::Statement;
use super::{Keyword, Lexer, Token};
use crate::error::{Error, Result};

/// The SQL parser takes tokens from the lexer and parses the SQL syntax into an
/// Abstract Syntax Tree (AST).
///
/// It only ensures the syntax is well-formed. Whether a table exists, whether
/// a property is known or a placeholder is bound is the analyzer's job.
pub struct Parser<'a> {
    pub lexer: Peekable<Lexer<'a>>,
    /// Counter for `?` placeholders
    param_count: usize,
}

impl Parser<'_> {
    /// Parses the input string into a SQL statement AST. The entire string must
    /// be parsed as a single statement, ending with an optional semicolon.
    pub fn parse(statement: &str) -> Result<Statement> {
        let mut parser = Self::new(statement);
        let statement = parser.parse_statement()?;
        parser.skip(Token::Semicolon);
        if let Some(token) = parser.lexer.next().transpose()? {
            return Err(Error::ParseError(format!("unexpected token {}", token)));
        }
        Ok(statement)
    }

    /// Creates a new parser for the given string.
    pub fn new(input: &str) -> Parser<'_> {
        Parser {
            lexer: Lexer::new(input).peekable(),
            param_count: 0,
        }
    }

    /// Parses a SQL statement.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        match self.peek()?.cloned() {
            Some(Token::Keyword(Keyword::Create)) => self.parse_create(),
            Some(Token::Keyword(Keyword::Drop)) => self.parse_drop(),
            Some(Token::Keyword(Keyword::Alter)) => self.parse_alter(),
            _ => {
                let token = self.next()?;
                Err(Error::ParseError(format!(
                    "expected statement, found {}",
                    token
                )))
            }
        }
    }
}

impl TokenHelper for Parser<'_> {
    fn next(&mut self) -> Result<Token> {
        self.lexer
            .next()
            .transpose()?
            .ok_or_else(|| Error::ParseError("unexpected end of input".into()))
    }

    fn peek(&mut self) -> Result<Option<&Token>> {
        self.lexer
            .peek()
            .map(|result| result.as_ref().map(Some).map_err(|e| e.clone()))
            .unwrap_or(Ok(None))
    }
}

impl LiteralParser for Parser<'_> {}

impl ExpressionParser for Parser<'_> {
    fn increment_param_count(&mut self) -> usize {
        let idx = self.param_count;
        self.param_count += 1;
        idx
    }
}

impl TypeParser for Parser<'_> {}

impl DdlParser for Parser<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ast::{
        AlterOperation, DdlStatement, Expression, IndexMethod, Literal, TableName,
    };
    use crate::types::DataType;

    fn ddl(sql: &str) -> DdlStatement {
        match Parser::parse(sql).unwrap() {
            Statement::Ddl(ddl) => ddl,
        }
    }

    #[test]
    fn test_create_table_full() {
        let statement = ddl("CREATE TABLE IF NOT EXISTS doc.t (
                id long primary key,
                name string INDEX USING FULLTEXT,
                secret string INDEX OFF,
                day timestamp,
                PRIMARY KEY (day)
            ) CLUSTERED BY (id) INTO 4 SHARDS PARTITIONED BY (day)
            WITH (number_of_replicas = '0-all', blocks.read_only = false);");
        let DdlStatement::CreateTable {
            name,
            columns,
            primary_key,
            clustered,
            partitioned_by,
            properties,
            if_not_exists,
        } = statement
        else {
            panic!("expected CREATE TABLE");
        };
        assert_eq!(name, TableName::new(Some("doc"), "t"));
        assert!(if_not_exists);
        assert_eq!(columns.len(), 4);
        assert!(columns[0].primary_key);
        assert_eq!(columns[0].datatype, DataType::Long);
        assert_eq!(columns[1].index, IndexMethod::Fulltext);
        assert_eq!(columns[2].index, IndexMethod::Off);
        assert_eq!(primary_key, vec!["day"]);
        let clustered = clustered.unwrap();
        assert_eq!(clustered.column.as_deref(), Some("id"));
        assert_eq!(
            clustered.number_of_shards,
            Some(Expression::Literal(Literal::Integer(4)))
        );
        assert_eq!(partitioned_by, vec!["day"]);
        assert_eq!(
            properties.get("number_of_replicas"),
            Some(&Expression::Literal(Literal::String("0-all".into())))
        );
        assert_eq!(
            properties.get("blocks.read_only"),
            Some(&Expression::Literal(Literal::Boolean(false)))
        );
    }

    #[test]
    fn test_placeholders_numbered_in_order() {
        let statement = ddl(
            "create blob table screenshots clustered into ? shards with (number_of_replicas = ?)",
        );
        let DdlStatement::CreateBlobTable {
            number_of_shards,
            properties,
            ..
        } = statement
        else {
            panic!("expected CREATE BLOB TABLE");
        };
        assert_eq!(number_of_shards, Some(Expression::Parameter(0)));
        assert_eq!(
            properties.get("number_of_replicas"),
            Some(&Expression::Parameter(1))
        );
    }

    #[test]
    fn test_parameter_count() {
        let statement = Parser::parse("create table t (id int) with (refresh_interval = $3)").unwrap();
        assert_eq!(statement.parameter_count(), 3);
        let statement = Parser::parse("drop table t").unwrap();
        assert_eq!(statement.parameter_count(), 0);
    }

    #[test]
    fn test_quoted_name_is_single_identifier() {
        let DdlStatement::CreateBlobTable { name, .. } = ddl("create blob table \"blob.s\"") else {
            panic!("expected CREATE BLOB TABLE");
        };
        assert_eq!(name, TableName::new(None, "blob.s"));
    }

    #[test]
    fn test_drop_and_alter() {
        assert_eq!(
            ddl("drop blob table if exists \"blob\".myblobs"),
            DdlStatement::DropTable {
                name: TableName::new(Some("blob"), "myblobs"),
                blob: true,
                if_exists: true,
            }
        );
        let DdlStatement::AlterTable {
            only,
            partition,
            operation,
            ..
        } = ddl("alter table parted partition (date = 1395874800000, obj['name'] = ?) reset (refresh_interval)")
        else {
            panic!("expected ALTER TABLE");
        };
        assert!(!only);
        let partition = partition.unwrap();
        assert_eq!(partition[0].0, "date");
        assert_eq!(partition[1], ("obj.name".to_string(), Expression::Parameter(0)));
        assert_eq!(
            operation,
            AlterOperation::Reset(vec!["refresh_interval".to_string()])
        );
    }

    #[test]
    fn test_negative_and_array_values() {
        let DdlStatement::AlterTable { operation, .. } = ddl(
            "alter table only t set (\"routing.allocation.total_shards_per_node\" = -1, number_of_replicas = [1, 2])",
        ) else {
            panic!("expected ALTER TABLE");
        };
        let AlterOperation::Set(properties) = operation else {
            panic!("expected SET");
        };
        assert_eq!(
            properties.get("routing.allocation.total_shards_per_node"),
            Some(&Expression::Literal(Literal::Integer(-1)))
        );
        assert_eq!(
            properties.get("number_of_replicas"),
            Some(&Expression::ArrayLiteral(vec![
                Literal::Integer(1).into(),
                Literal::Integer(2).into()
            ]))
        );
    }

    #[test]
    fn test_duplicate_property_rejected() {
        assert!(matches!(
            Parser::parse("create blob table b with (blobs_path = 'a', blobs_path = 'b')"),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert!(Parser::parse("drop table t t").is_err());
        assert!(Parser::parse("drop table a.b.c").is_err());
        assert!(Parser::parse("select 1").is_err());
    }
}
