//! SELECT / INSERT / UPDATE / DELETE generation.
//!
//! Clauses are gathered from the statement in attachment order and emitted in
//! SQL order.

use crate::ast::*;
use crate::dialect::SqlGenerator;
use crate::error::{OrmError, OrmResult};
use crate::parser::parse_where;
use crate::transpiler::conditions::{filter_sql, quote_ident, value_sql, ParamContext};

/// Render any statement kind.
pub fn build_statement(
    stmt: &Statement,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> OrmResult<String> {
    for clause in &stmt.clauses {
        if !clause.allowed_in(stmt.kind) {
            return Err(OrmError::invalid_clause(clause.name(), stmt.kind.keyword()));
        }
    }

    match stmt.kind {
        StatementKind::Select => build_select(stmt, generator, params),
        StatementKind::Insert => build_insert(stmt, generator, params),
        StatementKind::Update => build_update(stmt, generator, params),
        StatementKind::Delete => build_delete(stmt, generator, params),
    }
}

fn field_list(stmt: &Statement) -> Option<&[String]> {
    stmt.fields.as_deref().filter(|f| !f.is_empty())
}

fn ident_list(names: &[String], generator: &dyn SqlGenerator) -> OrmResult<String> {
    let quoted = names
        .iter()
        .map(|n| quote_ident(n, generator))
        .collect::<OrmResult<Vec<_>>>()?;
    Ok(quoted.join(", "))
}

/// ` WHERE ...` from every where clause, groups joined with AND.
fn where_sql(
    stmt: &Statement,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> OrmResult<String> {
    let mut groups: Vec<String> = Vec::new();

    for clause in &stmt.clauses {
        if let Clause::Where(predicate) = clause {
            let parsed;
            let filter = match predicate {
                Predicate::Text(text) => {
                    parsed = parse_where(text)?;
                    &parsed
                }
                Predicate::Typed(filter) => filter,
            };
            if let Some(group) = filter_sql(filter, generator, params)? {
                groups.push(group);
            }
        }
    }

    if groups.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!(" WHERE {}", groups.join(" AND ")))
    }
}

fn returning_sql(stmt: &Statement, generator: &dyn SqlGenerator) -> OrmResult<String> {
    let mut columns: Vec<String> = Vec::new();
    let mut requested = false;

    for clause in &stmt.clauses {
        if let Clause::Returning(cols) = clause {
            requested = true;
            columns.extend(cols.iter().cloned());
        }
    }

    if !requested {
        return Ok(String::new());
    }
    if !generator.supports_returning() {
        return Err(OrmError::unsupported("RETURNING", generator.dialect().name()));
    }
    if columns.is_empty() {
        Ok(" RETURNING *".to_string())
    } else {
        Ok(format!(" RETURNING {}", ident_list(&columns, generator)?))
    }
}

/// Generate SELECT SQL.
pub fn build_select(
    stmt: &Statement,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> OrmResult<String> {
    let mut sql = String::from("SELECT ");

    match field_list(stmt) {
        Some(fields) => sql.push_str(&ident_list(fields, generator)?),
        None => sql.push('*'),
    }

    sql.push_str(" FROM ");
    sql.push_str(&quote_ident(&stmt.table, generator)?);

    let mut order_by: Vec<String> = Vec::new();
    let mut limit: Option<u64> = None;
    let mut offset: Option<u64> = None;

    for clause in &stmt.clauses {
        match clause {
            Clause::Join(join) => sql.push_str(&join_sql(join, generator)?),
            Clause::OrderBy(col, order) => {
                let dir = match order {
                    SortOrder::Asc => "ASC",
                    SortOrder::Desc => "DESC",
                };
                order_by.push(format!("{} {}", quote_ident(col, generator)?, dir));
            }
            Clause::Limit(n) => limit = Some(*n),
            Clause::Offset(n) => offset = Some(*n),
            _ => {}
        }
    }

    sql.push_str(&where_sql(stmt, generator, params)?);

    if !order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_by.join(", "));
    }

    sql.push_str(&generator.limit_offset(limit, offset));

    Ok(sql)
}

fn join_sql(join: &Join, generator: &dyn SqlGenerator) -> OrmResult<String> {
    if join.kind == JoinKind::Full && !generator.supports_full_join() {
        return Err(OrmError::unsupported("FULL JOIN", generator.dialect().name()));
    }
    if join.on.is_empty() {
        return Err(OrmError::missing("ON", "JOIN"));
    }

    let pairs = join
        .on
        .iter()
        .map(|(left, right)| {
            Ok(format!(
                "{} = {}",
                quote_ident(left, generator)?,
                quote_ident(right, generator)?
            ))
        })
        .collect::<OrmResult<Vec<_>>>()?;

    Ok(format!(
        " {} {} ON {}",
        join.kind.as_sql(),
        quote_ident(&join.table, generator)?,
        pairs.join(" AND ")
    ))
}

/// Generate INSERT SQL.
pub fn build_insert(
    stmt: &Statement,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> OrmResult<String> {
    let mut sql = String::from("INSERT INTO ");
    sql.push_str(&quote_ident(&stmt.table, generator)?);

    let fields = field_list(stmt);
    if let Some(fields) = fields {
        sql.push_str(" (");
        sql.push_str(&ident_list(fields, generator)?);
        sql.push(')');
    }

    let rows: Vec<&Vec<Value>> = stmt
        .clauses
        .iter()
        .filter_map(|c| match c {
            Clause::Values(row) => Some(row),
            _ => None,
        })
        .collect();

    let expected = match (fields, rows.first()) {
        (Some(fields), _) => fields.len(),
        (None, Some(first)) => first.len(),
        (None, None) => 0,
    };
    if rows.is_empty() || expected == 0 {
        return Err(OrmError::missing("VALUES", "INSERT"));
    }

    let mut rendered: Vec<String> = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if row.len() != expected {
            return Err(OrmError::ArityMismatch {
                row: i + 1,
                expected,
                found: row.len(),
            });
        }
        let values = row
            .iter()
            .map(|v| value_sql(v, generator, params))
            .collect::<OrmResult<Vec<_>>>()?;
        rendered.push(format!("({})", values.join(", ")));
    }

    sql.push_str(" VALUES ");
    sql.push_str(&rendered.join(", "));
    sql.push_str(&returning_sql(stmt, generator)?);

    Ok(sql)
}

/// Generate UPDATE SQL.
pub fn build_update(
    stmt: &Statement,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> OrmResult<String> {
    let mut sql = String::from("UPDATE ");
    sql.push_str(&quote_ident(&stmt.table, generator)?);

    let mut set_clauses: Vec<String> = Vec::new();
    for clause in &stmt.clauses {
        if let Clause::Set(assignments) = clause {
            for (col, value) in assignments {
                set_clauses.push(format!(
                    "{} = {}",
                    quote_ident(col, generator)?,
                    value_sql(value, generator, params)?
                ));
            }
        }
    }

    if set_clauses.is_empty() {
        return Err(OrmError::missing("SET", "UPDATE"));
    }

    sql.push_str(" SET ");
    sql.push_str(&set_clauses.join(", "));
    sql.push_str(&where_sql(stmt, generator, params)?);
    sql.push_str(&returning_sql(stmt, generator)?);

    Ok(sql)
}

/// Generate DELETE SQL.
pub fn build_delete(
    stmt: &Statement,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> OrmResult<String> {
    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&quote_ident(&stmt.table, generator)?);
    sql.push_str(&where_sql(stmt, generator, params)?);
    sql.push_str(&returning_sql(stmt, generator)?);
    Ok(sql)
}
