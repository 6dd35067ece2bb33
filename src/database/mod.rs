// Copyright 2023 Remi Bernotavicius

use crate::{Error, Result};
use diesel::prelude::Connection as _;
use diesel::RunQueryDsl as _;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::{Path, PathBuf};

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Opens the database at `path` with foreign-key enforcement turned on and the schema brought
/// up to date. Migrations that were already applied are skipped.
pub fn establish_connection(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    let url = path
        .to_str()
        .ok_or_else(|| Error::validation(format!("database path {path:?} is not valid UTF-8")))?;
    let mut connection = Connection::establish(url)?;

    // SQLite only enforces the declared cascades when this is set on each connection
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut connection)?;

    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(Error::Migration)?;
    for migration in applied {
        log::info!("applied migration {migration}");
    }
    Ok(connection)
}

/// Handle to the on-disk catalog. Holds no connection itself; every action calls `connect` and
/// the returned connection is closed when it goes out of scope.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Create the schema up front so a broken file is reported before any prompting starts
        establish_connection(&path)?;
        log::info!("opened catalog at {}", path.display());

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> Result<Connection> {
        establish_connection(&self.path)
    }
}

#[cfg(test)]
pub fn test_connection() -> Connection {
    establish_connection(":memory:").unwrap()
}

#[test]
fn migrations() {
    let dir = tempfile::tempdir().unwrap();
    let database_path = dir.path().join("database.sqlite");

    // Running twice must be a no-op the second time
    let mut conn = establish_connection(&database_path).unwrap();
    drop(conn);
    conn = establish_connection(&database_path).unwrap();
    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());

    conn.revert_all_migrations(MIGRATIONS).unwrap();
    assert!(conn.has_pending_migration(MIGRATIONS).unwrap());
    conn.run_pending_migrations(MIGRATIONS).unwrap();
    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());
}

#[test]
fn store_creates_parent_directories() {
    use crate::database::models::{Category, NewCategory};
    use crate::repository::Repository as _;

    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("nested/catalog.db")).unwrap();
    assert!(store.path().exists());

    let created = {
        let mut conn = store.connect().unwrap();
        Category::create(
            &mut conn,
            &NewCategory {
                name: "Dinner".into(),
            },
        )
        .unwrap()
    };

    // A fresh connection sees what the previous action committed
    let mut conn = store.connect().unwrap();
    assert_eq!(
        Category::get_by_id(&mut conn, created.id).unwrap(),
        Some(created)
    );
}
