use sqlx::postgres::PgPoolOptions;

use crate::config::Config;

pub type Database = sqlx::Pool<sqlx::Postgres>;

/// Creates the `notes` table if it does not exist yet.
///
/// Safe to run on every start, it never touches existing rows.
pub const CREATE_NOTES_TABLE: &str = r#"
	CREATE TABLE IF NOT EXISTS notes (
		id SERIAL PRIMARY KEY,
		title VARCHAR(255) NOT NULL,
		content TEXT,
		created_at TIMESTAMP DEFAULT NOW(),
		updated_at TIMESTAMP DEFAULT NOW()
	)
"#;

/// Opens the connection pool, establishing one connection up front so that
/// an unreachable database is reported at startup.
pub async fn connect(config: &Config) -> Result<Database, sqlx::Error> {
	PgPoolOptions::new()
		.max_connections(config.max_connections)
		.acquire_timeout(config.acquire_timeout)
		.connect_with(config.database.clone())
		.await
}

#[tracing::instrument(skip_all)]
pub async fn init_schema(database: &Database) -> Result<(), sqlx::Error> {
	sqlx::query(CREATE_NOTES_TABLE).execute(database).await?;

	tracing::info!("notes table is ready");

	Ok(())
}

/// Runs a trivial query to confirm the database is reachable.
pub async fn ping(database: &Database) -> Result<(), sqlx::Error> {
	sqlx::query_scalar::<_, i32>("SELECT 1")
		.fetch_one(database)
		.await?;

	Ok(())
}

#[cfg(test)]
mod test {
	use crate::test::*;

	use super::{init_schema, ping};

	#[sqlx::test]
	async fn test_init_schema_is_idempotent(pool: Database) {
		init_schema(&pool).await.unwrap();

		let id = sqlx::query_scalar::<_, i32>(
			"INSERT INTO notes (title, content) VALUES ($1, $2) RETURNING id",
		)
		.bind("kept")
		.bind("across restarts")
		.fetch_one(&pool)
		.await
		.unwrap();

		init_schema(&pool).await.unwrap();
		init_schema(&pool).await.unwrap();

		let (title, content) = sqlx::query_as::<_, (String, String)>(
			"SELECT title, content FROM notes WHERE id = $1",
		)
		.bind(id)
		.fetch_one(&pool)
		.await
		.unwrap();

		assert_eq!(title, "kept");
		assert_eq!(content, "across restarts");
	}

	#[sqlx::test]
	async fn test_ping(pool: Database) {
		ping(&pool).await.unwrap();
	}

	#[tokio::test]
	async fn test_ping_unreachable() {
		assert!(ping(&unreachable_pool()).await.is_err());
	}
}
