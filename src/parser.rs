use crate::errors::QueryError;
use crate::types::{unquote, Value};
use nom::{
    bytes::complete::{tag, tag_no_case, take_until, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{eof, opt, rest},
    sequence::{preceded, tuple},
    IResult,
};
use std::cmp::Ordering;
use std::fmt;

// AST node definitions
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Load {
        filename: String,
    },
    Select {
        columns: Projection,
        table_name: String,
        predicate: Option<Predicate>,
    },
}

/// What a SELECT returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `*`
    All,
    Columns(Vec<String>),
    Count(CountTarget),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CountTarget {
    /// `COUNT(*)`
    All,
    Column(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
    /// The literal as written, quotes stripped. Text comparisons use this.
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
}

impl Operator {
    /// Scan order for WHERE text. Two-character operators come first so `>`
    /// never matches inside `>=`.
    pub const PRECEDENCE: [Operator; 6] = [
        Operator::GreaterEqual,
        Operator::LessEqual,
        Operator::NotEqual,
        Operator::Equal,
        Operator::Greater,
        Operator::Less,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
        }
    }

    /// Applies the operator to a comparison outcome. Unordered operands
    /// satisfy only `!=`; ordering operators on them yield `None`.
    pub fn evaluate(self, ordering: Option<Ordering>) -> Option<bool> {
        match (self, ordering) {
            (Operator::Equal, ord) => Some(ord == Some(Ordering::Equal)),
            (Operator::NotEqual, ord) => Some(ord != Some(Ordering::Equal)),
            (_, None) => None,
            (Operator::Greater, Some(ord)) => Some(ord == Ordering::Greater),
            (Operator::Less, Some(ord)) => Some(ord == Ordering::Less),
            (Operator::GreaterEqual, Some(ord)) => Some(ord != Ordering::Less),
            (Operator::LessEqual, Some(ord)) => Some(ord != Ordering::Greater),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Raw pieces of a SELECT before the column list and predicate are interpreted.
struct SelectParts<'a> {
    columns: &'a str,
    table_name: &'a str,
    predicate: Option<&'a str>,
}

/// Parses one query. Rules are tried in order: LOAD, the COUNT form, then the
/// generic SELECT form.
pub fn parse_sql(input: &str) -> Result<Query, QueryError> {
    let text = input.trim();

    if let Ok((_, path)) = load_statement(text) {
        let filename = path.trim().trim_matches(';').trim();
        return Ok(Query::Load {
            filename: filename.to_string(),
        });
    }

    if let Some(parts) = count_statement(text) {
        let column = parts.columns.trim();
        let target = if column == "*" {
            CountTarget::All
        } else {
            CountTarget::Column(column.to_string())
        };
        return select_query(Projection::Count(target), parts);
    }

    if let Some(parts) = select_statement(text) {
        let columns = if parts.columns.trim() == "*" {
            Projection::All
        } else {
            Projection::Columns(
                parts
                    .columns
                    .split(',')
                    .map(|column| column.trim().to_string())
                    .collect(),
            )
        };
        return select_query(columns, parts);
    }

    Err(QueryError::parse("Unsupported SQL query format"))
}

fn select_query(columns: Projection, parts: SelectParts<'_>) -> Result<Query, QueryError> {
    let predicate = match parts.predicate {
        Some(text) => Some(parse_predicate(text)?),
        None => None,
    };
    Ok(Query::Select {
        columns,
        table_name: parts.table_name.to_string(),
        predicate,
    })
}

/// Splits WHERE text at the first operator found, scanning operators in
/// [`Operator::PRECEDENCE`] order. The text is not tokenized, so an operator
/// character inside the column name or a quoted value can win the split.
pub fn parse_predicate(text: &str) -> Result<Predicate, QueryError> {
    for operator in Operator::PRECEDENCE {
        let symbol = operator.symbol();
        let found: IResult<&str, &str> = take_until(symbol)(text);
        if let Ok((remaining, column)) = found {
            let value = remaining[symbol.len()..].trim();
            return Ok(Predicate {
                column: column.trim().to_string(),
                operator,
                value: Value::literal(value),
                raw: unquote(value).unwrap_or(value).to_string(),
            });
        }
    }
    Err(QueryError::parse("Invalid WHERE clause format"))
}

// LOAD <path>, with exactly one space after the keyword
fn load_statement(input: &str) -> IResult<&str, &str> {
    preceded(tag_no_case("LOAD "), rest)(input)
}

// SELECT COUNT ( <col-or-*> ) FROM <table> [WHERE ...]
fn count_statement(input: &str) -> Option<SelectParts<'_>> {
    let opening: IResult<&str, _> = tuple((
        tag_no_case("SELECT"),
        multispace1,
        tag_no_case("COUNT"),
        multispace0,
        char('('),
    ))(input);
    let (inner, _) = opening.ok()?;

    // The argument runs to the first `)` after which the rest still parses.
    // Whitespace may surround it, but the argument itself is one line.
    inner
        .match_indices(')')
        .find_map(|(index, _)| {
            let argument = &inner[..index];
            if argument.trim_matches(is_space).contains('\n') {
                return None;
            }
            let (_, (table_name, predicate)) = from_clause(&inner[index + 1..]).ok()?;
            Some(SelectParts {
                columns: argument,
                table_name,
                predicate,
            })
        })
}

// SELECT <col-list-or-*> FROM <table> [WHERE ...]
fn select_statement(input: &str) -> Option<SelectParts<'_>> {
    let opening: IResult<&str, _> = tuple((tag_no_case("SELECT"), multispace1))(input);
    let (list, _) = opening.ok()?;

    // The column list is non-empty, stays on one line, and ends at the first
    // whitespace run that starts a FROM clause covering the rest of the input.
    list.char_indices()
        .filter(|&(index, c)| index > 0 && is_space(c))
        .take_while(|&(index, _)| !list[..index].contains('\n'))
        .find_map(|(index, _)| {
            let (_, (table_name, predicate)) = from_clause(&list[index..]).ok()?;
            Some(SelectParts {
                columns: &list[..index],
                table_name,
                predicate,
            })
        })
}

// FROM <table> [WHERE <predicate>] [;] <end>
fn from_clause(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, _) = multispace1(input)?;
    let (input, _) = tag_no_case("FROM")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, table_name) = identifier(input)?;
    let (input, predicate) = opt(where_clause)(input)?;
    let (input, _) = opt(tag(";"))(input)?;
    let (input, _) = eof(input)?;

    Ok((input, (table_name, predicate)))
}

// WHERE clause: everything to the end, less one trailing `;`
fn where_clause(input: &str) -> IResult<&str, &str> {
    let (input, _) = multispace1(input)?;
    let (input, _) = tag_no_case("WHERE")(input)?;
    let (input, _) = multispace1(input)?;

    let end = match input.strip_suffix(';') {
        Some(stripped) if !stripped.is_empty() => stripped.len(),
        _ => input.len(),
    };
    if end == 0 || input[..end].contains('\n') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::NonEmpty,
        )));
    }
    Ok((&input[end..], &input[..end]))
}

// The whitespace class `multispace0`/`multispace1` accept
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

// Identifier parser: letters, digits, underscore
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}
