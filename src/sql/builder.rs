//! Builds parameterized SELECT, COUNT, INSERT, UPSERT and DELETE statements for the `car` table.

use crate::criteria::{CarCriteria, CarField, Condition, FieldKind, FieldValue, Sort};
use crate::domain::Car;
use crate::sql::params::{like_pattern, SqlParam};

pub const CAR_TABLE: &str = "car";

/// DDL for the car table; idempotent.
pub const CREATE_CAR_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "car" (
    "id" BIGSERIAL PRIMARY KEY,
    "name" VARCHAR(255),
    "colour" VARCHAR(255),
    "price" INTEGER
)
"#;

/// Double-quoted SQL identifier; embedded quotes are doubled.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        Self::default()
    }

    fn push_param(&mut self, v: SqlParam) -> u32 {
        self.params.push(v);
        self.params.len() as u32
    }

    fn placeholder(&mut self, v: &FieldValue) -> String {
        format!("${}", self.push_param(v.into()))
    }
}

fn select_column_list() -> String {
    CarField::ALL
        .iter()
        .map(|f| quoted(f.column()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render one condition; binds its values onto `q`.
fn condition_sql(q: &mut QueryBuf, field: CarField, condition: &Condition) -> String {
    let col = quoted(field.column());
    match condition {
        Condition::Equals(v) => format!("{} = {}", col, q.placeholder(v)),
        Condition::NotEquals(v) => format!("{} <> {}", col, q.placeholder(v)),
        Condition::In(vs) | Condition::NotIn(vs) => {
            let negate = matches!(condition, Condition::NotIn(_));
            if vs.is_empty() {
                return if negate { format!("{} IS NOT NULL", col) } else { "1 = 0".into() };
            }
            let phs: Vec<String> = vs.iter().map(|v| q.placeholder(v)).collect();
            let op = if negate { "NOT IN" } else { "IN" };
            format!("{} {} ({})", col, op, phs.join(", "))
        }
        Condition::Specified(true) => format!("{} IS NOT NULL", col),
        Condition::Specified(false) => format!("{} IS NULL", col),
        Condition::Contains(s) => {
            let n = q.push_param(SqlParam::Text(Some(like_pattern(s))));
            format!("{} ILIKE ${}", col, n)
        }
        Condition::DoesNotContain(s) => {
            let n = q.push_param(SqlParam::Text(Some(like_pattern(s))));
            format!("NOT ({} ILIKE ${})", col, n)
        }
        Condition::GreaterThan(v) => format!("{} > {}", col, q.placeholder(v)),
        Condition::GreaterThanOrEqual(v) => format!("{} >= {}", col, q.placeholder(v)),
        Condition::LessThan(v) => format!("{} < {}", col, q.placeholder(v)),
        Condition::LessThanOrEqual(v) => format!("{} <= {}", col, q.placeholder(v)),
    }
}

fn where_clause(q: &mut QueryBuf, criteria: &CarCriteria) -> String {
    let parts: Vec<String> = criteria
        .iter()
        .map(|c| condition_sql(q, c.field, &c.condition))
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// ORDER BY the requested keys, then id so the order is total. Text keys sort bytewise.
fn order_clause(sort: &[Sort]) -> String {
    let mut keys: Vec<String> = sort
        .iter()
        .map(|s| match s.field.kind() {
            FieldKind::Text => format!("{} COLLATE \"C\" {}", quoted(s.field.column()), s.order.as_sql()),
            FieldKind::Integer => format!("{} {}", quoted(s.field.column()), s.order.as_sql()),
        })
        .collect();
    if !sort.iter().any(|s| s.field == CarField::Id) {
        keys.push(format!("{} ASC", quoted(CarField::Id.column())));
    }
    format!(" ORDER BY {}", keys.join(", "))
}

/// SELECT by primary key. Caller binds the id as `$1`.
pub fn select_by_id() -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_column_list(),
        quoted(CAR_TABLE),
        quoted(CarField::Id.column())
    )
}

/// SELECT by primary key with a row lock, for read-modify-write inside a transaction.
pub fn select_by_id_for_update() -> String {
    format!("{} FOR UPDATE", select_by_id())
}

pub fn exists_by_id() -> String {
    format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1)",
        quoted(CAR_TABLE),
        quoted(CarField::Id.column())
    )
}

/// SELECT with criteria and ordering.
pub fn select_list(criteria: &CarCriteria, sort: &[Sort]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = where_clause(&mut q, criteria);
    q.sql = format!(
        "SELECT {} FROM {}{}{}",
        select_column_list(),
        quoted(CAR_TABLE),
        where_clause,
        order_clause(sort)
    );
    q
}

pub fn count(criteria: &CarCriteria) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = where_clause(&mut q, criteria);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", quoted(CAR_TABLE), where_clause);
    q
}

fn data_params(q: &mut QueryBuf, car: &Car) -> [String; 3] {
    [
        format!("${}", q.push_param(SqlParam::Text(car.name.clone()))),
        format!("${}", q.push_param(SqlParam::Text(car.colour.clone()))),
        format!("${}", q.push_param(SqlParam::Int(car.price))),
    ]
}

/// INSERT without id; the sequence assigns it.
pub fn insert(car: &Car) -> QueryBuf {
    let mut q = QueryBuf::new();
    let [name, colour, price] = data_params(&mut q, car);
    q.sql = format!(
        "INSERT INTO {} ({}, {}, {}) VALUES ({}, {}, {}) RETURNING {}",
        quoted(CAR_TABLE),
        quoted("name"),
        quoted("colour"),
        quoted("price"),
        name,
        colour,
        price,
        select_column_list()
    );
    q
}

/// INSERT with id, replacing every column when the row exists.
pub fn upsert(id: i64, car: &Car) -> QueryBuf {
    let mut q = QueryBuf::new();
    let id_ph = format!("${}", q.push_param(SqlParam::BigInt(id)));
    let [name, colour, price] = data_params(&mut q, car);
    q.sql = format!(
        "INSERT INTO {t} ({id}, {n}, {c}, {p}) VALUES ({}, {}, {}, {}) \
         ON CONFLICT ({id}) DO UPDATE SET {n} = EXCLUDED.{n}, {c} = EXCLUDED.{c}, {p} = EXCLUDED.{p} \
         RETURNING {cols}",
        id_ph,
        name,
        colour,
        price,
        t = quoted(CAR_TABLE),
        id = quoted("id"),
        n = quoted("name"),
        c = quoted("colour"),
        p = quoted("price"),
        cols = select_column_list()
    );
    q
}

/// DELETE by id. Caller binds the id as `$1`.
pub fn delete() -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1",
        quoted(CAR_TABLE),
        quoted(CarField::Id.column())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::SortOrder;

    #[test]
    fn list_without_criteria_orders_by_id() {
        let q = select_list(&CarCriteria::new(), &[]);
        assert_eq!(
            q.sql,
            r#"SELECT "id", "name", "colour", "price" FROM "car" ORDER BY "id" ASC"#
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn criteria_become_bound_where_clause() {
        let criteria = CarCriteria::new()
            .and(CarField::Name, Condition::Contains("AAA".into()))
            .and(CarField::Price, Condition::GreaterThan(FieldValue::Integer(0)))
            .and(
                CarField::Colour,
                Condition::In(vec![FieldValue::Text("red".into()), FieldValue::Text("blue".into())]),
            );
        let sort = [Sort { field: CarField::Price, order: SortOrder::Desc }];
        let q = select_list(&criteria, &sort);
        assert_eq!(
            q.sql,
            r#"SELECT "id", "name", "colour", "price" FROM "car" WHERE "name" ILIKE $1 AND "price" > $2 AND "colour" IN ($3, $4) ORDER BY "price" DESC, "id" ASC"#
        );
        assert_eq!(
            q.params,
            vec![
                SqlParam::Text(Some("%AAA%".into())),
                SqlParam::BigInt(0),
                SqlParam::Text(Some("red".into())),
                SqlParam::Text(Some("blue".into())),
            ]
        );
    }

    #[test]
    fn count_shares_the_where_clause() {
        let criteria = CarCriteria::new()
            .and(CarField::Price, Condition::Specified(false))
            .and(CarField::Name, Condition::DoesNotContain("x".into()));
        let q = count(&criteria);
        assert_eq!(
            q.sql,
            r#"SELECT COUNT(*) FROM "car" WHERE "price" IS NULL AND NOT ("name" ILIKE $1)"#
        );
    }

    #[test]
    fn text_sort_keys_use_byte_collation() {
        let sort = [
            Sort { field: CarField::Name, order: SortOrder::Asc },
            Sort { field: CarField::Price, order: SortOrder::Desc },
        ];
        let q = select_list(&CarCriteria::new(), &sort);
        assert!(q
            .sql
            .ends_with(r#"ORDER BY "name" COLLATE "C" ASC, "price" DESC, "id" ASC"#));
    }

    #[test]
    fn quoted_doubles_embedded_quotes() {
        assert_eq!(quoted(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn insert_skips_id() {
        let q = insert(&Car::new().name("a").price(3));
        assert!(q.sql.starts_with(r#"INSERT INTO "car" ("name", "colour", "price") VALUES ($1, $2, $3)"#));
        assert_eq!(
            q.params,
            vec![SqlParam::Text(Some("a".into())), SqlParam::Text(None), SqlParam::Int(Some(3))]
        );
    }

    #[test]
    fn upsert_binds_id_first() {
        let q = upsert(5, &Car::new());
        assert!(q.sql.contains(r#"ON CONFLICT ("id") DO UPDATE"#));
        assert_eq!(q.params[0], SqlParam::BigInt(5));
        assert_eq!(q.params.len(), 4);
    }
}
