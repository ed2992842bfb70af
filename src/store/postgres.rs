use crate::criteria::{CarCriteria, Sort};
use crate::domain::Car;
use crate::error::{AppError, ConfigError};
use crate::sql::{self, bind_params, QueryBuf};
use crate::store::{CarRepository, UpdateFn};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgRow};
use sqlx::{ConnectOptions, PgPool, Row};
use std::str::FromStr;

pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_car<'e, E>(executor: E, q: &QueryBuf) -> Result<Car, AppError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_one(executor)
            .await?;
        Ok(car_from_row(&row)?)
    }
}

fn car_from_row(row: &PgRow) -> Result<Car, sqlx::Error> {
    Ok(Car {
        id: Some(row.try_get("id")?),
        name: row.try_get("name")?,
        colour: row.try_get("colour")?,
        price: row.try_get("price")?,
    })
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn save(&self, car: Car) -> Result<Car, AppError> {
        let q = match car.id {
            None => sql::insert(&car),
            Some(id) => sql::upsert(id, &car),
        };
        Self::fetch_one_car(&self.pool, &q).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, AppError> {
        let stmt = sql::select_by_id();
        tracing::debug!(sql = %stmt, id, "query");
        let row = sqlx::query(&stmt).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(car_from_row).transpose()?)
    }

    async fn find_all(&self, criteria: &CarCriteria, sort: &[Sort]) -> Result<Vec<Car>, AppError> {
        let q = sql::select_list(criteria, sort);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(car_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn count(&self, criteria: &CarCriteria) -> Result<u64, AppError> {
        let q = sql::count(criteria);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.try_get(0)?;
        Ok(n.max(0) as u64)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        let exists: (bool,) = sqlx::query_as(&sql::exists_by_id())
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists.0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        let stmt = sql::delete();
        tracing::debug!(sql = %stmt, id, "query");
        sqlx::query(&stmt).bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn update_with(&self, id: i64, apply: UpdateFn) -> Result<Option<Car>, AppError> {
        let mut tx = self.pool.begin().await?;
        let stmt = sql::select_by_id_for_update();
        tracing::debug!(sql = %stmt, id, "query (tx)");
        let Some(row) = sqlx::query(&stmt).bind(id).fetch_optional(&mut *tx).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        let mut car = car_from_row(&row)?;
        apply(&mut car);
        let q = sql::upsert(id, &car);
        let saved = Self::fetch_one_car(&mut *tx, &q).await?;
        tx.commit().await?;
        Ok(Some(saved))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Create the `car` table if it does not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(sql::CREATE_CAR_TABLE).execute(pool).await?;
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database on the same server to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, db_name) = admin_options(database_url)?;
    let Some(db_name) = db_name.filter(|name| name != "postgres") else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Options for the `postgres` database on the server named by `url`, and the target database name.
/// A URL without a database path yields `None`.
fn admin_options(url: &str) -> Result<(PgConnectOptions, Option<String>), ConfigError> {
    let opts = PgConnectOptions::from_str(url).map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;
    let db_name = opts
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    Ok((opts.database("postgres"), db_name))
}
