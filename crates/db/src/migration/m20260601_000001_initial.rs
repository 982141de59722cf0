//! Initial database migration.
//!
//! Creates the users, currencies, and conversion_rates tables. Uniqueness
//! invariants (one user per username, one currency per code, one rate row
//! per ordered currency pair) live here as unique constraints so that
//! concurrent writers cannot race past an application-level check.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CURRENCIES_SQL).await?;
        db.execute_unprepared(CONVERSION_RATES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const USERS_SQL: &str = r"
CREATE TABLE users (
    id SERIAL PRIMARY KEY,
    username VARCHAR(255) NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT users_username_key UNIQUE (username)
);
";

const CURRENCIES_SQL: &str = r"
CREATE TABLE currencies (
    id SERIAL PRIMARY KEY,
    code VARCHAR(3) NOT NULL,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT currencies_code_key UNIQUE (code)
);
";

// Currency references are intentionally weak (no foreign keys): deleting a
// currency leaves dependent rate rows in place. See DESIGN.md.
const CONVERSION_RATES_SQL: &str = r"
CREATE TABLE conversion_rates (
    id SERIAL PRIMARY KEY,
    base_currency_id INTEGER NOT NULL,
    target_currency_id INTEGER NOT NULL,
    rate DOUBLE PRECISION NOT NULL CHECK (rate > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT conversion_rates_pair_key UNIQUE (base_currency_id, target_currency_id)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS conversion_rates;
DROP TABLE IF EXISTS currencies;
DROP TABLE IF EXISTS users;
";
