//! Car entity, its wire representation, and the merge-patch body.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Persisted car row. Equality is by identity: only two cars carrying the same id are equal.
#[derive(Clone, Debug, Default)]
pub struct Car {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub colour: Option<String>,
    pub price: Option<i32>,
}

impl Car {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = Some(colour.into());
        self
    }

    pub fn price(mut self, price: i32) -> Self {
        self.price = Some(price);
        self
    }
}

impl PartialEq for Car {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

/// JSON shape of a car. All four keys are always serialized; missing keys deserialize as null.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CarDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub colour: Option<String>,
    #[serde(default)]
    pub price: Option<i32>,
}

impl PartialEq for CarDto {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

/// Merge-patch body. A key that is omitted or `null` leaves the stored field unchanged.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct CarPatch {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub colour: Option<String>,
    #[serde(default)]
    pub price: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cars_without_id_are_never_equal() {
        let a = Car::new().name("AAAAAAAAAA");
        let b = a.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn cars_are_equal_by_id() {
        let a = Car { id: Some(1), ..Car::new().name("a") };
        let b = Car { id: Some(1), ..Car::new().name("b") };
        let c = Car { id: Some(2), ..Car::new().name("a") };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn dto_serializes_every_key() {
        let dto = CarDto { id: Some(3), ..Default::default() };
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"id": 3, "name": null, "colour": null, "price": null})
        );
    }

    #[test]
    fn patch_reads_null_as_unset() {
        let patch: CarPatch =
            serde_json::from_str(r#"{"id": 7, "name": "BBBBBBBBBB", "colour": null}"#).unwrap();
        assert_eq!(patch.id, Some(7));
        assert_eq!(patch.name.as_deref(), Some("BBBBBBBBBB"));
        assert_eq!(patch.colour, None);
        assert_eq!(patch.price, None);
    }
}
