use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS profiles (
        user_id           UUID PRIMARY KEY,
        name              TEXT NOT NULL,
        email             TEXT NOT NULL,
        phone             TEXT,
        experience        TEXT,
        skills            TEXT,
        education         TEXT,
        linkedin          TEXT,
        github            TEXT,
        portfolio         TEXT,
        api_key           TEXT NOT NULL,
        resume_drive_link TEXT,
        updated_at        TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS resume_files (
        user_id     UUID PRIMARY KEY,
        file_name   TEXT NOT NULL,
        bytes       BYTEA NOT NULL,
        uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS form_states (
        user_id         UUID PRIMARY KEY,
        recruiter_email TEXT NOT NULL,
        job_description TEXT NOT NULL,
        job_title       TEXT NOT NULL,
        timestamp       TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the tables this service needs if they are missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to apply schema")?;
    }
    info!("Database schema ready");
    Ok(())
}
