//! Postgres-backed inventory store.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Duplicate` | Identifier already present (primary key) |
//! | Database (check constraint violation) | `23514` | `Storage` | Negative quantity reached the table |
//! | Database (other) | Any other | `Storage` | Other database errors |
//! | PoolClosed | N/A | `Storage` | Connection pool was closed |
//! | Other | N/A | `Storage` | Network errors, connection failures, decode errors |
//!
//! `UPDATE`/`DELETE` statements that affect zero rows are reported as `NoMatch`
//! and roll back the surrounding batch.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use tracing::{Span, instrument};

use hotcoffee_inventory::{IngredientId, InventoryItem};

use super::r#trait::{InventoryStore, StoreError, WriteOp};

/// Postgres-backed inventory repository.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and shareable across
/// request handlers. Every write runs inside an explicit transaction; a dropped
/// transaction is rolled back by SQLx, so early returns cannot leak partial writes.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    #[instrument(
        skip(self, ops),
        fields(op_count = ops.len(), committed_ops = tracing::field::Empty),
        err
    )]
    async fn apply(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        if ops.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        for op in &ops {
            if let Err(err) = execute_op(&mut tx, op).await {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                return Err(err);
            }
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Span::current().record("committed_ops", ops.len());
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get_all(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT ingredient_id, name, quantity, unit
            FROM inventory
            ORDER BY ingredient_id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_all", e))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let item = InventoryRow::from_row(&row)
                .map_err(|e| map_sqlx_error("decode_inventory_row", e))?;
            items.push(item.into());
        }
        Ok(items)
    }

    #[instrument(skip(self), fields(ingredient_id = %ingredient_id), err)]
    async fn find(&self, ingredient_id: &IngredientId) -> Result<Option<InventoryItem>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT ingredient_id, name, quantity, unit
            FROM inventory
            WHERE ingredient_id = $1
            "#,
        )
        .bind(ingredient_id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find", e))?;

        row.map(|row| {
            InventoryRow::from_row(&row)
                .map(InventoryItem::from)
                .map_err(|e| map_sqlx_error("decode_inventory_row", e))
        })
        .transpose()
    }

    #[instrument(skip(self, item), fields(ingredient_id = %item.ingredient_id), err)]
    async fn exists(&self, item: &InventoryItem) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM inventory WHERE ingredient_id = $1) AS present")
            .bind(item.ingredient_id.as_str())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists", e))?;

        row.try_get::<bool, _>("present")
            .map_err(|e| map_sqlx_error("decode_exists", e))
    }
}

async fn execute_op(tx: &mut Transaction<'_, Postgres>, op: &WriteOp) -> Result<(), StoreError> {
    match op {
        WriteOp::Insert(item) => {
            sqlx::query(
                r#"
                INSERT INTO inventory (ingredient_id, name, quantity, unit)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(item.ingredient_id.as_str())
            .bind(&item.name)
            .bind(item.quantity)
            .bind(&item.unit)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate(item.ingredient_id.clone())
                } else {
                    map_sqlx_error("insert_item", e)
                }
            })?;
        }
        WriteOp::UpdateQuantity {
            ingredient_id,
            quantity,
        } => {
            let result = sqlx::query(
                r#"
                UPDATE inventory
                SET quantity = $1,
                    updated_at = CURRENT_TIMESTAMP
                WHERE ingredient_id = $2
                "#,
            )
            .bind(*quantity)
            .bind(ingredient_id.as_str())
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("update_quantity", e))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NoMatch(ingredient_id.clone()));
            }
        }
        WriteOp::Delete(ingredient_id) => {
            let result = sqlx::query("DELETE FROM inventory WHERE ingredient_id = $1")
                .bind(ingredient_id.as_str())
                .execute(&mut **tx)
                .await
                .map_err(|e| map_sqlx_error("delete_item", e))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NoMatch(ingredient_id.clone()));
            }
        }
    }
    Ok(())
}

/// Map SQLx errors to store errors with appropriate categorization.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23514") => StoreError::Storage(format!(
                    "check constraint violated in {}: {}",
                    operation,
                    db_err.message()
                )),
                _ => StoreError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Storage(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

// SQLx row types

#[derive(Debug)]
struct InventoryRow {
    ingredient_id: String,
    name: String,
    quantity: f64,
    unit: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for InventoryRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(InventoryRow {
            ingredient_id: row.try_get("ingredient_id")?,
            name: row.try_get("name")?,
            quantity: row.try_get("quantity")?,
            unit: row.try_get("unit")?,
        })
    }
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        InventoryItem::new(IngredientId::new(row.ingredient_id), row.name, row.quantity, row.unit)
    }
}
