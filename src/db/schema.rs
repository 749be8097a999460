//! Schema versioning for the notes database.
//!
//! Each step runs inside its own transaction together with the row that
//! records it in `schema_versions`, so a failed step leaves nothing behind.

use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction};

use super::{format_timestamp, parse_timestamp};

enum Step {
    Sql(&'static str),
    Rust(fn(&Transaction<'_>) -> Result<()>),
}

struct Migration {
    version: u32,
    name: &'static str,
    step: Step,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_notes",
        step: Step::Sql(include_str!("migrations/001_initial.sql")),
    },
    Migration {
        version: 2,
        name: "notes_updated_at_index",
        step: Step::Sql(include_str!("migrations/002_notes_updated_at_index.sql")),
    },
    Migration {
        version: 3,
        name: "normalize_timestamps",
        step: Step::Rust(normalize_timestamps),
    },
];

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_versions (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )
    .context("Failed to create schema_versions table")?;

    let current = current_version(conn)?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        apply(conn, migration).with_context(|| {
            format!("Migration {} ({}) failed", migration.version, migration.name)
        })?;
    }

    Ok(())
}

fn current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_versions", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

fn apply(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let tx = conn.transaction()?;

    match migration.step {
        Step::Sql(sql) => tx.execute_batch(sql)?,
        Step::Rust(run) => run(&tx)?,
    }

    tx.execute(
        "INSERT INTO schema_versions (version, name, applied_at) VALUES (?, ?, ?)",
        (migration.version, migration.name, format_timestamp(chrono::Utc::now())),
    )?;
    tx.commit()?;

    tracing::info!("Applied schema version {} ({})", migration.version, migration.name);
    Ok(())
}

/// Rewrite timestamps stored by older deployments (naive `isoformat()`
/// strings, with or without fractional seconds) into the fixed-width UTC
/// form, so that text ordering agrees with time ordering across all rows.
/// Values that do not parse are left untouched and reported.
fn normalize_timestamps(tx: &Transaction<'_>) -> Result<()> {
    let rows = {
        let mut stmt = tx.prepare("SELECT id, created_at, updated_at FROM notes")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };

    let mut rewritten = 0usize;
    for (id, created_at, updated_at) in rows {
        let (Some(created), Some(updated)) = (canonical(&created_at), canonical(&updated_at))
        else {
            tracing::warn!(id, "Leaving note with unreadable timestamps as stored");
            continue;
        };
        if created != created_at || updated != updated_at {
            tx.execute(
                "UPDATE notes SET created_at = ?, updated_at = ? WHERE id = ?",
                (&created, &updated, id),
            )?;
            rewritten += 1;
        }
    }

    if rewritten > 0 {
        tracing::info!("Normalized timestamps on {} legacy notes", rewritten);
    }
    Ok(())
}

fn canonical(stamp: &str) -> Option<String> {
    parse_timestamp(0, stamp.to_string())
        .ok()
        .map(format_timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(conn: &Connection) -> Vec<u32> {
        let mut stmt = conn
            .prepare("SELECT version FROM schema_versions ORDER BY version")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn stamps(conn: &Connection, id: i64) -> (String, String) {
        conn.query_row(
            "SELECT created_at, updated_at FROM notes WHERE id = ?",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap()
    }

    #[test]
    fn fresh_database_gets_every_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        assert_eq!(versions(&conn), vec![1, 2, 3]);
        let index: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type='index' AND name='idx_notes_updated_at'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn rerunning_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();

        assert_eq!(versions(&conn), vec![1, 2, 3]);
    }

    #[test]
    fn legacy_timestamps_are_rewritten_to_fixed_width() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            INSERT INTO notes (title, body, created_at, updated_at) VALUES
                ('Fractional', 'a', '2024-01-02T03:04:05.000006', '2024-01-02T03:04:05.000006'),
                ('Whole', 'b', '2024-01-02T03:04:05', '2024-02-02T10:00:00'),
                ('Current', 'c', '2024-01-02T03:04:05.000000Z', '2024-01-02T03:04:05.000000Z'),
                ('Broken', 'd', 'someday', 'someday');",
        )
        .unwrap();

        run_migrations(&mut conn).unwrap();

        assert_eq!(
            stamps(&conn, 1),
            (
                "2024-01-02T03:04:05.000006Z".to_string(),
                "2024-01-02T03:04:05.000006Z".to_string()
            )
        );
        assert_eq!(
            stamps(&conn, 2),
            (
                "2024-01-02T03:04:05.000000Z".to_string(),
                "2024-02-02T10:00:00.000000Z".to_string()
            )
        );
        assert_eq!(stamps(&conn, 3).0, "2024-01-02T03:04:05.000000Z");
        assert_eq!(stamps(&conn, 4), ("someday".to_string(), "someday".to_string()));
        assert_eq!(versions(&conn), vec![1, 2, 3]);
    }
}
