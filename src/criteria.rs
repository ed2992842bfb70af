//! Dynamic filter criteria over car fields.
//!
//! Query parameters of the form `<field>.<operator>=<value>` are parsed into a
//! [`CarCriteria`]: a list of per-field [`Condition`]s combined with AND. The
//! same criteria value is evaluated in memory ([`CarCriteria::matches`]) or
//! rendered into SQL by [`crate::sql`].
//!
//! A condition on a null field never matches, except `specified=false`. This
//! mirrors SQL three-valued logic so both stores return the same rows.

use crate::domain::Car;
use crate::error::AppError;
use std::cmp::Ordering;
use std::fmt;

/// Filterable and sortable car fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CarField {
    Id,
    Name,
    Colour,
    Price,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
}

/// A typed value read from a car or parsed from a query parameter.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl CarField {
    pub const ALL: [CarField; 4] = [CarField::Id, CarField::Name, CarField::Colour, CarField::Price];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(CarField::Id),
            "name" => Some(CarField::Name),
            "colour" => Some(CarField::Colour),
            "price" => Some(CarField::Price),
            _ => None,
        }
    }

    /// Column name in the `car` table; also the JSON key.
    pub fn column(&self) -> &'static str {
        match self {
            CarField::Id => "id",
            CarField::Name => "name",
            CarField::Colour => "colour",
            CarField::Price => "price",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            CarField::Id | CarField::Price => FieldKind::Integer,
            CarField::Name | CarField::Colour => FieldKind::Text,
        }
    }

    pub fn value(&self, car: &Car) -> Option<FieldValue> {
        match self {
            CarField::Id => car.id.map(FieldValue::Integer),
            CarField::Name => car.name.clone().map(FieldValue::Text),
            CarField::Colour => car.colour.clone().map(FieldValue::Text),
            CarField::Price => car.price.map(|p| FieldValue::Integer(p.into())),
        }
    }

    /// Parse a raw query value for this field. `price` is range-checked against `i32`.
    pub fn parse_value(&self, raw: &str) -> Result<FieldValue, AppError> {
        let invalid = || AppError::filter(format!("invalid value for {}: '{}'", self.column(), raw));
        match self {
            CarField::Id => raw.trim().parse::<i64>().map(FieldValue::Integer).map_err(|_| invalid()),
            CarField::Price => raw
                .trim()
                .parse::<i32>()
                .map(|p| FieldValue::Integer(p.into()))
                .map_err(|_| invalid()),
            CarField::Name | CarField::Colour => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for CarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One operator applied to one field.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Equals(FieldValue),
    NotEquals(FieldValue),
    In(Vec<FieldValue>),
    NotIn(Vec<FieldValue>),
    Specified(bool),
    Contains(String),
    DoesNotContain(String),
    GreaterThan(FieldValue),
    GreaterThanOrEqual(FieldValue),
    LessThan(FieldValue),
    LessThanOrEqual(FieldValue),
}

impl Condition {
    /// Build a condition from its query-string operator name.
    pub fn parse(field: CarField, operator: &str, raw: &str) -> Result<Self, AppError> {
        let numeric_only = |op: &str| {
            if field.kind() == FieldKind::Integer {
                Ok(())
            } else {
                Err(AppError::filter(format!("{} is not supported on text field {}", op, field)))
            }
        };
        let text_only = |op: &str| {
            if field.kind() == FieldKind::Text {
                Ok(())
            } else {
                Err(AppError::filter(format!("{} is not supported on numeric field {}", op, field)))
            }
        };
        let list = |raw: &str| {
            raw.split(',')
                .map(|item| field.parse_value(item))
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(match operator {
            "equals" => Condition::Equals(field.parse_value(raw)?),
            "notEquals" => Condition::NotEquals(field.parse_value(raw)?),
            "in" => Condition::In(list(raw)?),
            "notIn" => Condition::NotIn(list(raw)?),
            "specified" => match raw.trim() {
                "true" => Condition::Specified(true),
                "false" => Condition::Specified(false),
                _ => return Err(AppError::filter(format!("specified expects true or false, got '{}'", raw))),
            },
            "contains" => {
                text_only(operator)?;
                Condition::Contains(raw.to_string())
            }
            "doesNotContain" => {
                text_only(operator)?;
                Condition::DoesNotContain(raw.to_string())
            }
            "greaterThan" => {
                numeric_only(operator)?;
                Condition::GreaterThan(field.parse_value(raw)?)
            }
            "greaterThanOrEqual" => {
                numeric_only(operator)?;
                Condition::GreaterThanOrEqual(field.parse_value(raw)?)
            }
            "lessThan" => {
                numeric_only(operator)?;
                Condition::LessThan(field.parse_value(raw)?)
            }
            "lessThanOrEqual" => {
                numeric_only(operator)?;
                Condition::LessThanOrEqual(field.parse_value(raw)?)
            }
            other => return Err(AppError::filter(format!("unknown filter operator '{}' on {}", other, field))),
        })
    }

    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        let Some(value) = value else {
            return matches!(self, Condition::Specified(false));
        };
        match self {
            Condition::Equals(v) => value == v,
            Condition::NotEquals(v) => value != v,
            Condition::In(vs) => vs.contains(value),
            Condition::NotIn(vs) => !vs.contains(value),
            Condition::Specified(present) => *present,
            Condition::Contains(needle) => text_contains(value, needle),
            Condition::DoesNotContain(needle) => !text_contains(value, needle),
            Condition::GreaterThan(v) => value > v,
            Condition::GreaterThanOrEqual(v) => value >= v,
            Condition::LessThan(v) => value < v,
            Condition::LessThanOrEqual(v) => value <= v,
        }
    }
}

/// Case-insensitive substring match.
fn text_contains(value: &FieldValue, needle: &str) -> bool {
    match value {
        FieldValue::Text(s) => s.to_lowercase().contains(&needle.to_lowercase()),
        FieldValue::Integer(_) => false,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Criterion {
    pub field: CarField,
    pub condition: Condition,
}

/// Conjunction of field conditions. Empty criteria match every car.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarCriteria {
    criteria: Vec<Criterion>,
}

impl CarCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, field: CarField, condition: Condition) -> Self {
        self.criteria.push(Criterion { field, condition });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    pub fn matches(&self, car: &Car) -> bool {
        self.criteria
            .iter()
            .all(|c| c.condition.matches(c.field.value(car).as_ref()))
    }

    /// Parse `<field>.<operator>=<value>` pairs. Keys that do not name a car field are skipped.
    pub fn from_params(params: &[(String, String)]) -> Result<Self, AppError> {
        let mut criteria = CarCriteria::new();
        for (key, value) in params {
            let Some((field, operator)) = key.split_once('.') else { continue };
            let Some(field) = CarField::parse(field) else { continue };
            let condition = Condition::parse(field, operator, value)?;
            criteria = criteria.and(field, condition);
        }
        Ok(criteria)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sort {
    pub field: CarField,
    pub order: SortOrder,
}

impl Sort {
    /// Parse `field` or `field,asc|desc`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut parts = raw.split(',').map(str::trim);
        let name = parts.next().unwrap_or_default();
        let field = CarField::parse(name)
            .ok_or_else(|| AppError::filter(format!("unknown sort field '{}'", name)))?;
        let order = match parts.next() {
            None | Some("") => SortOrder::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            Some(dir) => return Err(AppError::filter(format!("unknown sort direction '{}'", dir))),
        };
        Ok(Sort { field, order })
    }

    /// Collect every `sort` parameter in order.
    pub fn from_params(params: &[(String, String)]) -> Result<Vec<Sort>, AppError> {
        params
            .iter()
            .filter(|(k, _)| k == "sort")
            .map(|(_, v)| Sort::parse(v))
            .collect()
    }
}

/// Ordering used by the in-memory store. Nulls sort after values ascending and before them
/// descending, like PostgreSQL. Text compares bytewise, matching the `COLLATE "C"` the SQL
/// builder puts on text sort keys. Ties fall back to id ascending.
pub fn compare_cars(sorts: &[Sort], a: &Car, b: &Car) -> Ordering {
    for sort in sorts {
        let ord = match (sort.field.value(a), sort.field.value(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => x.cmp(&y),
        };
        let ord = match sort.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.id.cmp(&b.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_car() -> Car {
        Car {
            id: Some(1),
            ..Car::new().name("AAAAAAAAAA").colour("AAAAAAAAAA").price(1)
        }
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn found(filter: (&str, &str)) -> bool {
        CarCriteria::from_params(&params(&[filter])).unwrap().matches(&default_car())
    }

    #[test]
    fn empty_criteria_match_everything() {
        assert!(CarCriteria::new().matches(&default_car()));
        assert!(CarCriteria::new().matches(&Car::new()));
    }

    #[test]
    fn price_ranges() {
        assert!(found(("price.greaterThan", "0")));
        assert!(!found(("price.greaterThan", "1")));
        assert!(found(("price.greaterThanOrEqual", "1")));
        assert!(!found(("price.greaterThanOrEqual", "2")));
        assert!(found(("price.lessThanOrEqual", "1")));
        assert!(!found(("price.lessThanOrEqual", "0")));
        assert!(found(("price.lessThan", "2")));
        assert!(!found(("price.lessThan", "1")));
    }

    #[test]
    fn id_filters() {
        assert!(found(("id.equals", "1")));
        assert!(!found(("id.notEquals", "1")));
        assert!(found(("id.greaterThanOrEqual", "1")));
        assert!(!found(("id.greaterThan", "1")));
        assert!(found(("id.lessThanOrEqual", "1")));
        assert!(!found(("id.lessThan", "1")));
    }

    #[test]
    fn text_filters() {
        assert!(found(("name.equals", "AAAAAAAAAA")));
        assert!(!found(("name.equals", "BBBBBBBBBB")));
        assert!(found(("name.notEquals", "BBBBBBBBBB")));
        assert!(found(("name.contains", "AAA")));
        assert!(found(("name.contains", "aaa")));
        assert!(!found(("name.doesNotContain", "AAA")));
        assert!(found(("colour.doesNotContain", "BBB")));
    }

    #[test]
    fn in_and_not_in() {
        assert!(found(("name.in", "AAAAAAAAAA,BBBBBBBBBB")));
        assert!(!found(("name.in", "BBBBBBBBBB")));
        assert!(found(("price.in", "1,2")));
        assert!(!found(("price.notIn", "1,2")));
        assert!(found(("price.notIn", "2,3")));
    }

    #[test]
    fn specified() {
        assert!(found(("price.specified", "true")));
        assert!(!found(("price.specified", "false")));
        let bare = Car { id: Some(2), ..Car::new() };
        let criteria = CarCriteria::from_params(&params(&[("name.specified", "false")])).unwrap();
        assert!(criteria.matches(&bare));
    }

    #[test]
    fn null_field_fails_negated_conditions() {
        let bare = Car { id: Some(2), ..Car::new() };
        for filter in [("name.notEquals", "x"), ("name.doesNotContain", "x"), ("price.notIn", "5")] {
            let criteria = CarCriteria::from_params(&params(&[filter])).unwrap();
            assert!(!criteria.matches(&bare), "{:?}", filter);
        }
    }

    #[test]
    fn conditions_are_anded() {
        let criteria = CarCriteria::from_params(&params(&[
            ("name.contains", "AAA"),
            ("price.greaterThan", "5"),
        ]))
        .unwrap();
        assert!(!criteria.matches(&default_car()));
    }

    #[test]
    fn unrelated_params_are_ignored() {
        let criteria = CarCriteria::from_params(&params(&[
            ("sort", "id,desc"),
            ("page", "0"),
            ("owner.equals", "x"),
        ]))
        .unwrap();
        assert!(criteria.is_empty());
    }

    #[test]
    fn malformed_filters_are_rejected() {
        for filter in [
            ("price.equals", "abc"),
            ("price.contains", "1"),
            ("name.greaterThan", "a"),
            ("name.specified", "maybe"),
            ("name.startsWith", "a"),
            ("price.equals", "99999999999"),
        ] {
            let err = CarCriteria::from_params(&params(&[filter])).unwrap_err();
            assert_eq!(err.code(), "badrequest", "{:?}", filter);
        }
    }

    #[test]
    fn sort_parsing() {
        let sorts = Sort::from_params(&params(&[("sort", "price,desc"), ("sort", "name")])).unwrap();
        assert_eq!(
            sorts,
            vec![
                Sort { field: CarField::Price, order: SortOrder::Desc },
                Sort { field: CarField::Name, order: SortOrder::Asc },
            ]
        );
        assert!(Sort::parse("wheels,asc").is_err());
        assert!(Sort::parse("id,sideways").is_err());
    }

    #[test]
    fn nulls_sort_last_ascending() {
        let a = Car { id: Some(1), ..Car::new() };
        let b = Car { id: Some(2), ..Car::new().price(5) };
        let asc = [Sort { field: CarField::Price, order: SortOrder::Asc }];
        let desc = [Sort { field: CarField::Price, order: SortOrder::Desc }];
        assert_eq!(compare_cars(&asc, &a, &b), Ordering::Greater);
        assert_eq!(compare_cars(&desc, &a, &b), Ordering::Less);
        assert_eq!(compare_cars(&[], &a, &b), Ordering::Less);
    }

    #[test]
    fn text_sorts_bytewise() {
        let upper = Car { id: Some(1), ..Car::new().name("Zeta") };
        let lower = Car { id: Some(2), ..Car::new().name("alpha") };
        let asc = [Sort { field: CarField::Name, order: SortOrder::Asc }];
        assert_eq!(compare_cars(&asc, &upper, &lower), Ordering::Less);
    }
}
