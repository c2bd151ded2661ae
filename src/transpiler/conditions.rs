use crate::ast::*;
use crate::dialect::SqlGenerator;
use crate::error::{OrmError, OrmResult};

/// Collects parameters while a statement is rendered.
///
/// In inline mode literals are spelled out in the SQL text; in parameterized
/// mode each literal becomes the next placeholder and is pushed to `params`.
#[derive(Debug, Default)]
pub struct ParamContext {
    /// Current parameter index (1-based for Postgres $1, $2, etc.)
    pub index: usize,
    /// Collected parameter values in order
    pub params: Vec<Value>,
    parameterize: bool,
    /// First explicit `$n` seen, if any
    explicit: Option<usize>,
    /// Explicit references rendered so far
    explicit_count: usize,
}

impl ParamContext {
    pub fn inline() -> Self {
        Self::default()
    }

    pub fn parameterized() -> Self {
        Self {
            parameterize: true,
            ..Self::default()
        }
    }

    /// Add a literal and return the placeholder for it.
    fn add_param(&mut self, value: &Value, generator: &dyn SqlGenerator) -> OrmResult<String> {
        if let Some(n) = self.explicit {
            return Err(OrmError::MixedParameters(n));
        }
        self.index += 1;
        self.params.push(value.clone());
        Ok(generator.placeholder(self.index))
    }

    /// Render a caller-numbered `$n` reference.
    fn explicit_param(&mut self, n: usize, generator: &dyn SqlGenerator) -> OrmResult<String> {
        if n == 0 {
            return Err(OrmError::InvalidValue(
                "$0 (parameters are numbered from 1)".to_string(),
            ));
        }
        if self.parameterize && !self.params.is_empty() {
            return Err(OrmError::MixedParameters(n));
        }
        self.explicit.get_or_insert(n);
        self.explicit_count += 1;

        match generator.numbered_placeholder(n) {
            Some(placeholder) => Ok(placeholder),
            // Positional binding: $1..$k, each once, in textual order.
            None if n == self.explicit_count => Ok(generator.placeholder(n)),
            None => Err(OrmError::unsupported(
                "Out-of-order parameter references",
                generator.dialect().name(),
            )),
        }
    }
}

fn is_plain_part(part: &str) -> bool {
    let mut chars = part.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate and quote a table or column name.
pub fn quote_ident(name: &str, generator: &dyn SqlGenerator) -> OrmResult<String> {
    let valid = name.split('.').all(|part| part == "*" || is_plain_part(part));
    if !valid {
        return Err(OrmError::InvalidIdentifier(name.to_string()));
    }
    Ok(generator.quote_identifier(name))
}

/// Spell a literal inline.
fn literal_sql(value: &Value, generator: &dyn SqlGenerator) -> OrmResult<String> {
    let sql = match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => generator.bool_literal(*b),
        Value::Int(n) => n.to_string(),
        Value::Float(n) if !n.is_finite() => {
            return Err(OrmError::InvalidValue(format!("{} has no SQL literal", n)));
        }
        Value::Float(n) => format!("{:?}", n),
        Value::String(s) => generator.string_literal(s),
        Value::Timestamp(ts) => {
            generator.string_literal(&ts.format(TIMESTAMP_FORMAT).to_string())
        }
        other => other.to_string(),
    };
    Ok(sql)
}

/// Render a value in a comparison, assignment or VALUES row.
pub fn value_sql(
    value: &Value,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> OrmResult<String> {
    match value {
        Value::Param(n) => params.explicit_param(*n, generator),
        Value::Column(name) => quote_ident(name, generator),
        Value::Raw(sql) => Ok(sql.clone()),
        Value::List(values) => {
            let items = values
                .iter()
                .map(|v| value_sql(v, generator, params))
                .collect::<OrmResult<Vec<_>>>()?;
            Ok(format!("({})", items.join(", ")))
        }
        literal if params.parameterize => params.add_param(literal, generator),
        literal => literal_sql(literal, generator),
    }
}

/// Render one condition.
pub fn condition_sql(
    cond: &Condition,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> OrmResult<String> {
    let col = quote_ident(&cond.column, generator)?;

    match (cond.op, &cond.value) {
        (Operator::IsNull | Operator::IsNotNull, _) => Ok(format!("{} {}", col, cond.op.as_sql())),
        // `= NULL` is never true.
        (Operator::Eq, Value::Null) => Ok(format!("{} IS NULL", col)),
        (Operator::Ne, Value::Null) => Ok(format!("{} IS NOT NULL", col)),
        // Empty lists are valid SQL nowhere; fold them to constant predicates.
        (Operator::In, Value::List(values)) if values.is_empty() => Ok("1 = 0".to_string()),
        (Operator::NotIn, Value::List(values)) if values.is_empty() => Ok("1 = 1".to_string()),
        (Operator::In | Operator::NotIn, Value::List(_)) => Ok(format!(
            "{} {} {}",
            col,
            cond.op.as_sql(),
            value_sql(&cond.value, generator, params)?
        )),
        (Operator::In | Operator::NotIn, single) => Ok(format!(
            "{} {} ({})",
            col,
            cond.op.as_sql(),
            value_sql(single, generator, params)?
        )),
        (op, value) => Ok(format!(
            "{} {} {}",
            col,
            op.as_sql(),
            value_sql(value, generator, params)?
        )),
    }
}

/// Render a filter group. Multi-condition OR groups are parenthesised so they
/// can be AND-ed with sibling groups.
pub fn filter_sql(
    filter: &Filter,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> OrmResult<Option<String>> {
    if filter.conditions.is_empty() {
        return Ok(None);
    }

    let joiner = match filter.logical_op {
        LogicalOp::And => " AND ",
        LogicalOp::Or => " OR ",
    };
    let conditions = filter
        .conditions
        .iter()
        .map(|c| condition_sql(c, generator, params))
        .collect::<OrmResult<Vec<_>>>()?;
    let group = conditions.join(joiner);

    if filter.logical_op == LogicalOp::Or && filter.conditions.len() > 1 {
        Ok(Some(format!("({})", group)))
    } else {
        Ok(Some(group))
    }
}
