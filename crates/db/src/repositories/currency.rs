//! Currency repository for catalog database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::entities::currencies;

/// Error types for currency operations.
#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    /// Currency code already exists.
    #[error("Currency code already exists")]
    DuplicateCode,

    /// Currency not found.
    #[error("Currency '{0}' not found")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Currency repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    db: DatabaseConnection,
}

impl CurrencyRepository {
    /// Creates a new currency repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new currency.
    ///
    /// The code is expected to be validated and uppercased by the caller.
    /// The unique index on code is the source of truth for duplicates.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::DuplicateCode` if the code is already
    /// present; the registry is unchanged in that case.
    pub async fn create(&self, code: &str, name: &str) -> Result<currencies::Model, CurrencyError> {
        let currency = currencies::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        currency
            .insert(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => CurrencyError::DuplicateCode,
                _ => CurrencyError::Database(e),
            })
    }

    /// Lists all currencies in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<currencies::Model>, CurrencyError> {
        currencies::Entity::find()
            .order_by_asc(currencies::Column::Id)
            .all(&self.db)
            .await
            .map_err(CurrencyError::Database)
    }

    /// Finds a currency by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<currencies::Model>, CurrencyError> {
        currencies::Entity::find()
            .filter(currencies::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(CurrencyError::Database)
    }

    /// Deletes a currency by code.
    ///
    /// This is a hard delete. Dependent conversion rate rows are not
    /// touched and keep referencing the deleted currency id.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::NotFound` if no currency has this code.
    pub async fn delete_by_code(&self, code: &str) -> Result<(), CurrencyError> {
        let result = currencies::Entity::delete_many()
            .filter(currencies::Column::Code.eq(code))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CurrencyError::NotFound(code.to_string()));
        }

        Ok(())
    }
}
