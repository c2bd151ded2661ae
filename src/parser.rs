//! Where-expression parser using nom.
//!
//! Turns the text handed to `Statement::where_clause` into a typed [`Filter`]
//! so it can be quoted and parameterized per dialect.
//!
//! # Syntax Overview
//!
//! ```text
//! id = $1 AND role IN ('admin', 'mod') AND deleted_at IS NULL
//! ─┬ ┬ ┬─ ─┬─
//!  │ │ │   └── Connective (AND or OR, one kind per expression)
//!  │ │ └── Value (param, string, number, bool, null, func(), column)
//!  │ └── Operator (= != <> > >= < <= LIKE IN IS NULL, with NOT forms)
//!  └── Column (optionally qualified: users.id)
//! ```

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, tag_no_case, take_while},
    character::complete::{char, digit1, multispace0, multispace1, satisfy},
    combinator::{map, map_res, not, opt, recognize, value, verify},
    multi::{many0, separated_list0},
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::ast::*;
use crate::error::{OrmError, OrmResult};

/// Parse a complete where expression.
pub fn parse_where(input: &str) -> OrmResult<Filter> {
    let lead = input.len() - input.trim_start().len();
    let expr = input.trim();
    if expr.is_empty() {
        return Err(OrmError::parse(0, "Empty where expression"));
    }

    let position = |rest: &str| lead + expr.len() - rest.len();

    let (first, links) = match parse_expr(expr) {
        Ok(("", parsed)) => parsed,
        Ok((remaining, _)) => {
            return Err(OrmError::parse(
                position(remaining),
                format!("Unexpected trailing content: '{}'", remaining),
            ));
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(OrmError::parse(
                position(e.input),
                format!("Expected a condition ({:?})", e.code),
            ));
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(OrmError::parse(position(""), "Incomplete expression"));
        }
    };

    let logical_op = links.first().map(|(_, op, _)| *op).unwrap_or_default();
    let mut conditions = vec![first];
    for (at, op, cond) in links {
        if op != logical_op {
            return Err(OrmError::parse(
                position(at),
                "Cannot mix AND and OR in one where clause; use separate clauses",
            ));
        }
        conditions.push(cond);
    }

    Ok(Filter {
        conditions,
        logical_op,
    })
}

type Link<'a> = (&'a str, LogicalOp, Condition);

/// Parse a condition followed by any number of connective/condition pairs.
fn parse_expr(input: &str) -> IResult<&str, (Condition, Vec<Link<'_>>)> {
    let (input, first) = parse_condition(input)?;
    let (input, links) = many0(parse_link)(input)?;
    Ok((input, (first, links)))
}

fn parse_link(input: &str) -> IResult<&str, Link<'_>> {
    let (input, _) = multispace1(input)?;
    let at = input;
    let (input, op) = alt((
        value(LogicalOp::And, keyword("and")),
        value(LogicalOp::Or, keyword("or")),
    ))(input)?;
    let (input, _) = multispace1(input)?;
    let (input, cond) = parse_condition(input)?;
    Ok((input, (at, op, cond)))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Match a keyword case-insensitively, refusing identifier prefixes (`notes`).
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(kw), not(satisfy(is_ident_char)))
}

fn parse_identifier_part(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ))(input)
}

/// Parse an identifier, optionally qualified (`table.column`).
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        parse_identifier_part,
        many0(pair(char('.'), parse_identifier_part)),
    ))(input)
}

/// Parse a single condition.
fn parse_condition(input: &str) -> IResult<&str, Condition> {
    let (input, column) = parse_identifier(input)?;
    let (input, (op, value)) = alt((parse_is_null, parse_in, parse_like, parse_comparison))(input)?;

    Ok((
        input,
        Condition {
            column: column.to_string(),
            op,
            value,
        },
    ))
}

fn parse_negation(input: &str) -> IResult<&str, bool> {
    map(opt(terminated(keyword("not"), multispace1)), |n| n.is_some())(input)
}

/// `IS NULL` / `IS NOT NULL`
fn parse_is_null(input: &str) -> IResult<&str, (Operator, Value)> {
    let (input, _) = multispace1(input)?;
    let (input, _) = keyword("is")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, negated) = parse_negation(input)?;
    let (input, _) = keyword("null")(input)?;

    let op = if negated {
        Operator::IsNotNull
    } else {
        Operator::IsNull
    };
    Ok((input, (op, Value::Null)))
}

/// `IN (a, b)` / `NOT IN (a, b)`
fn parse_in(input: &str) -> IResult<&str, (Operator, Value)> {
    let (input, _) = multispace1(input)?;
    let (input, negated) = parse_negation(input)?;
    let (input, _) = keyword("in")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, values) = separated_list0(
        tuple((multispace0, char(','), multispace0)),
        parse_value,
    )(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;

    let op = if negated { Operator::NotIn } else { Operator::In };
    Ok((input, (op, Value::List(values))))
}

/// `LIKE pattern` / `NOT LIKE pattern`
fn parse_like(input: &str) -> IResult<&str, (Operator, Value)> {
    let (input, _) = multispace1(input)?;
    let (input, negated) = parse_negation(input)?;
    let (input, _) = keyword("like")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, pattern) = parse_value(input)?;

    let op = if negated {
        Operator::NotLike
    } else {
        Operator::Like
    };
    Ok((input, (op, pattern)))
}

/// Symbolic comparison operators.
fn parse_comparison(input: &str) -> IResult<&str, (Operator, Value)> {
    let (input, _) = multispace0(input)?;
    let (input, op) = alt((
        value(Operator::Gte, tag(">=")),
        value(Operator::Lte, tag("<=")),
        value(Operator::Ne, tag("!=")),
        value(Operator::Ne, tag("<>")),
        value(Operator::Eq, char('=')),
        value(Operator::Gt, char('>')),
        value(Operator::Lt, char('<')),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, val) = parse_value(input)?;
    Ok((input, (op, val)))
}

/// Parse a value.
fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((
        // Parameter: $1, $2, etc. Numbering starts at 1.
        map(
            verify(
                map_res(preceded(char('$'), digit1), |n: &str| n.parse::<usize>()),
                |n: &usize| *n > 0,
            ),
            Value::Param,
        ),
        parse_quoted_string,
        parse_number,
        value(Value::Bool(true), keyword("true")),
        value(Value::Bool(false), keyword("false")),
        value(Value::Null, keyword("null")),
        // Function: name()
        map(
            recognize(pair(parse_identifier, tag("()"))),
            |s: &str| Value::Raw(s.to_string()),
        ),
        // Bare identifier is a column reference
        map(parse_identifier, |s| Value::Column(s.to_string())),
    ))(input)
}

/// Parse a number (integer or float).
fn parse_number(input: &str) -> IResult<&str, Value> {
    let start = input;
    let (input, num_str) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)?;

    let parsed = if num_str.contains('.') {
        num_str.parse::<f64>().ok().map(Value::Float)
    } else {
        num_str.parse::<i64>().ok().map(Value::Int)
    };

    match parsed {
        Some(v) => Ok((input, v)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            start,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

/// Parse a single-quoted string, `''` standing for one quote.
fn parse_quoted_string(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('\'')(input)?;
    let (input, parts) = many0(alt((
        map(is_not("'"), |s: &str| s.to_string()),
        value("'".to_string(), tag("''")),
    )))(input)?;
    let (input, _) = char('\'')(input)?;

    Ok((input, Value::String(parts.concat())))
}
