use std::{path::Path, time::Duration};

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::{LedgerDatabase, SqliteDatabase};

pub const TEST_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

/// A fresh, migrated database at a random location.
pub async fn fresh_database() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 10, TEST_LOCK_TIMEOUT).await.expect("Error creating connection to database")
}

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/wallet_ledger_test_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let mut db =
        SqliteDatabase::new_with_url(url, 1, TEST_LOCK_TIMEOUT).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    let _ = db.close().await;
}

pub async fn create_database<P: AsRef<Path>>(path: P) {
    let p = path.as_ref().as_os_str().to_str().expect("Database path is not valid UTF-8");
    if Sqlite::database_exists(p).await.unwrap_or(false) {
        if let Err(e) = Sqlite::drop_database(p).await {
            warn!("Error dropping database {p}: {e:?}");
        }
    }
    Sqlite::create_database(p).await.expect("Error creating database");
    info!("Created Sqlite database {p}");
}

/// Closes the database and deletes its file.
pub async fn tear_down(mut db: SqliteDatabase) {
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    if let Err(e) = Sqlite::drop_database(db.url()).await {
        warn!("🚀️ Failed to drop database {}: {e}", db.url());
    }
}
