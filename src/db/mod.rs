use crate::error::StorageError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub mod draft;

mod embedded {
    refinery::embed_migrations!("migrations");
}

const APP_DIR: &str = "interview-quiz";

pub fn get_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share").join(APP_DIR)
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share").join(APP_DIR)
    }
}

pub fn get_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("quiz.db")
}

pub fn init_db(data_dir: &Path) -> Result<Connection, StorageError> {
    std::fs::create_dir_all(data_dir)?;
    let mut conn = Connection::open(get_db_path(data_dir))?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

pub fn run_migrations(conn: &mut Connection) -> Result<(), StorageError> {
    let report = embedded::migrations::runner().run(conn)?;
    for migration in report.applied_migrations() {
        tracing::info!(migration = %migration, "applied migration");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_create_drafts_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"drafts".to_string()));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();
    }

    #[test]
    fn test_init_db_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join("nested").join("data");
        init_db(&data_dir).unwrap();
        assert!(get_db_path(&data_dir).exists());
    }
}
