use rusqlite::{Connection, OptionalExtension, Result};

/// Single slot the setup editor is persisted under.
pub const DRAFT_KEY: &str = "interview-notes-draft";

pub fn load_draft(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT content FROM drafts WHERE key = ?",
        [key],
        |row| row.get(0),
    )
    .optional()
}

pub fn save_draft(conn: &Connection, key: &str, content: &str) -> Result<()> {
    let updated_at = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO drafts (key, content, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
        rusqlite::params![key, content, updated_at],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    fn conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_missing_draft_is_none() {
        assert_eq!(load_draft(&conn(), DRAFT_KEY).unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let conn = conn();
        save_draft(&conn, DRAFT_KEY, "Event loop phases").unwrap();
        assert_eq!(
            load_draft(&conn, DRAFT_KEY).unwrap().as_deref(),
            Some("Event loop phases")
        );
    }

    #[test]
    fn test_save_overwrites_single_row() {
        let conn = conn();
        save_draft(&conn, DRAFT_KEY, "first").unwrap();
        save_draft(&conn, DRAFT_KEY, "").unwrap();

        assert_eq!(load_draft(&conn, DRAFT_KEY).unwrap().as_deref(), Some(""));
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM drafts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_draft_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        {
            let conn = crate::db::init_db(temp_dir.path()).unwrap();
            save_draft(&conn, DRAFT_KEY, "## Closures\n- capture by move").unwrap();
        }
        let conn = crate::db::init_db(temp_dir.path()).unwrap();
        assert_eq!(
            load_draft(&conn, DRAFT_KEY).unwrap().as_deref(),
            Some("## Closures\n- capture by move")
        );
    }
}
