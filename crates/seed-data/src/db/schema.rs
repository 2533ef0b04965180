//! Idempotent DDL for the dashboard tables.
//!
//! Every statement is "create if absent". An existing table is never altered
//! or dropped, whatever its current columns are.

use sqlx::PgConnection;

use crate::error::SeedError;

/// Installs `uuid-ossp` (for `uuid_generate_v4()`) into `public`, so it stays
/// visible whatever schema the session writes its tables to.
pub async fn ensure_uuid_extension(conn: &mut PgConnection) -> Result<(), SeedError> {
    sqlx::query(r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp" WITH SCHEMA public"#)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn ensure_users_table(conn: &mut PgConnection) -> Result<(), SeedError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn ensure_customers_table(conn: &mut PgConnection) -> Result<(), SeedError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            image_url VARCHAR(255) NOT NULL
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// `customer_id` is not a foreign key.
pub async fn ensure_invoices_table(conn: &mut PgConnection) -> Result<(), SeedError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invoices (
            id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
            customer_id UUID NOT NULL,
            amount INT NOT NULL,
            status VARCHAR(255) NOT NULL,
            date DATE NOT NULL
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn ensure_revenue_table(conn: &mut PgConnection) -> Result<(), SeedError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS revenue (
            month VARCHAR(4) NOT NULL UNIQUE,
            revenue INT NOT NULL
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;
    Ok(())
}
