//! Typed query parameters and their binding onto sqlx queries.

use crate::criteria::FieldValue;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

/// A value bound to a `$n` placeholder. Nulls keep their column type so PostgreSQL can infer it.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    BigInt(i64),
    Int(Option<i32>),
    Text(Option<String>),
}

impl From<&FieldValue> for SqlParam {
    fn from(v: &FieldValue) -> Self {
        match v {
            FieldValue::Integer(n) => SqlParam::BigInt(*n),
            FieldValue::Text(s) => SqlParam::Text(Some(s.clone())),
        }
    }
}

/// Bind params in placeholder order.
pub fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [SqlParam],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = match p {
            SqlParam::BigInt(n) => query.bind(*n),
            SqlParam::Int(n) => query.bind(*n),
            SqlParam::Text(s) => query.bind(s.as_deref()),
        };
    }
    query
}

/// Escape `LIKE` wildcards so user input matches literally, then wrap in `%..%`.
pub fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
