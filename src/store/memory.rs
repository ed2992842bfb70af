use crate::criteria::{compare_cars, CarCriteria, Sort};
use crate::domain::Car;
use crate::error::AppError;
use crate::store::{CarRepository, UpdateFn};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct Rows {
    cars: BTreeMap<i64, Car>,
    next_id: i64,
}

/// Process-local car store. Ids start at 1 and only grow; every call runs under one lock.
#[derive(Debug)]
pub struct InMemoryCarRepository {
    rows: RwLock<Rows>,
}

impl Default for InMemoryCarRepository {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Rows {
                cars: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl InMemoryCarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Rows> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Rows> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CarRepository for InMemoryCarRepository {
    async fn save(&self, mut car: Car) -> Result<Car, AppError> {
        let mut rows = self.write();
        let id = match car.id {
            Some(id) => id,
            None => rows.next_id,
        };
        rows.next_id = rows.next_id.max(id.saturating_add(1));
        car.id = Some(id);
        rows.cars.insert(id, car.clone());
        Ok(car)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, AppError> {
        Ok(self.read().cars.get(&id).cloned())
    }

    async fn find_all(&self, criteria: &CarCriteria, sort: &[Sort]) -> Result<Vec<Car>, AppError> {
        let mut cars: Vec<Car> = self
            .read()
            .cars
            .values()
            .filter(|c| criteria.matches(c))
            .cloned()
            .collect();
        cars.sort_by(|a, b| compare_cars(sort, a, b));
        Ok(cars)
    }

    async fn count(&self, criteria: &CarCriteria) -> Result<u64, AppError> {
        Ok(self.read().cars.values().filter(|c| criteria.matches(c)).count() as u64)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.read().cars.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        self.write().cars.remove(&id);
        Ok(())
    }

    async fn update_with(&self, id: i64, apply: UpdateFn) -> Result<Option<Car>, AppError> {
        let mut rows = self.write();
        let Some(car) = rows.cars.get_mut(&id) else {
            return Ok(None);
        };
        apply(car);
        car.id = Some(id);
        Ok(Some(car.clone()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{CarField, Condition, FieldValue, SortOrder};

    #[tokio::test]
    async fn save_assigns_increasing_ids() {
        let repo = InMemoryCarRepository::new();
        let a = repo.save(Car::new().name("a")).await.unwrap();
        let b = repo.save(Car::new().name("b")).await.unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(repo.count(&CarCriteria::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn save_with_id_replaces_row() {
        let repo = InMemoryCarRepository::new();
        let a = repo.save(Car::new().name("a").price(1)).await.unwrap();
        let replaced = repo
            .save(Car { id: a.id, ..Car::new().name("b") })
            .await
            .unwrap();
        assert_eq!(replaced.id, a.id);
        let stored = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("b"));
        assert_eq!(stored.price, None);
        assert_eq!(repo.count(&CarCriteria::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryCarRepository::new();
        repo.save(Car::new()).await.unwrap();
        repo.delete_by_id(1).await.unwrap();
        repo.delete_by_id(1).await.unwrap();
        let next = repo.save(Car::new()).await.unwrap();
        assert_eq!(next.id, Some(2));
    }

    #[tokio::test]
    async fn find_all_filters_and_sorts() {
        let repo = InMemoryCarRepository::new();
        for price in [3, 1, 2] {
            repo.save(Car::new().price(price)).await.unwrap();
        }
        repo.save(Car::new()).await.unwrap();

        let criteria = CarCriteria::new().and(CarField::Price, Condition::GreaterThan(FieldValue::Integer(1)));
        let sort = [Sort { field: CarField::Price, order: SortOrder::Desc }];
        let prices: Vec<_> = repo
            .find_all(&criteria, &sort)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.price)
            .collect();
        assert_eq!(prices, vec![Some(3), Some(2)]);
        assert_eq!(repo.count(&criteria).await.unwrap(), 2);

        let ids: Vec<_> = repo
            .find_all(&CarCriteria::new(), &[])
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[tokio::test]
    async fn update_with_missing_id_is_none() {
        let repo = InMemoryCarRepository::new();
        let out = repo
            .update_with(42, Box::new(|car: &mut Car| car.price = Some(9)))
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn update_with_keeps_id() {
        let repo = InMemoryCarRepository::new();
        repo.save(Car::new().price(1)).await.unwrap();
        let out = repo
            .update_with(
                1,
                Box::new(|car: &mut Car| {
                    car.id = Some(77);
                    car.price = Some(9);
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(out.id, Some(1));
        assert_eq!(out.price, Some(9));
    }
}
