use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDateTime;
use rusqlite::{
    params, types::Type, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};

use crate::models::Todo;

const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens the database and makes sure the schema exists. Used once at
    /// startup; request handling goes through [`Database::open`].
    pub fn connect<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let db = Self::open(path.as_ref())
            .with_context(|| format!("opening database at {}", path.as_ref().display()))?;
        migrate(&db.conn).context("creating todo schema")?;
        Ok(db)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self { conn })
    }

    pub fn transaction(&mut self, behavior: TransactionBehavior) -> rusqlite::Result<Transaction<'_>> {
        self.conn.transaction_with_behavior(behavior)
    }
}

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS todo (
            todo_id INTEGER PRIMARY KEY AUTOINCREMENT,
            todo_title TEXT NOT NULL,
            finished INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        "#,
    )
}

/// Single-statement access to the `todo` table. Every call runs on whatever
/// connection or transaction the repository was built from.
pub struct TodoRepository<'c> {
    conn: &'c Connection,
}

impl<'c> TodoRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_id(&self, id: i64) -> rusqlite::Result<Option<Todo>> {
        self.conn
            .query_row(
                "SELECT todo_id, todo_title, finished, created_at FROM todo WHERE todo_id = ?1",
                params![id],
                todo_from_row,
            )
            .optional()
    }

    pub fn find_all(&self) -> rusqlite::Result<Vec<Todo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT todo_id, todo_title, finished, created_at FROM todo")?;
        let rows = stmt.query_map([], todo_from_row)?;

        let mut todos = Vec::new();
        for todo in rows {
            todos.push(todo?);
        }
        Ok(todos)
    }

    /// Writes a new row and stores the generated key back into `todo.id`.
    pub fn insert(&self, todo: &mut Todo) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO todo (todo_title, finished, created_at) VALUES (?1, ?2, ?3)",
            params![
                todo.title,
                todo.finished,
                todo.created_at.format(STORAGE_FORMAT).to_string()
            ],
        )?;
        todo.id = self.conn.last_insert_rowid();
        Ok(())
    }

    pub fn mark_finished(&self, id: i64) -> rusqlite::Result<usize> {
        self.conn
            .execute("UPDATE todo SET finished = 1 WHERE todo_id = ?1", params![id])
    }

    pub fn delete_by_id(&self, id: i64) -> rusqlite::Result<usize> {
        self.conn
            .execute("DELETE FROM todo WHERE todo_id = ?1", params![id])
    }

    pub fn count_by_finished(&self, finished: bool) -> rusqlite::Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM todo WHERE finished = ?1",
            params![finished],
            |row| row.get(0),
        )
    }
}

fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    let created_at: String = row.get(3)?;
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        finished: row.get(2)?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn parse_datetime(value: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, STORAGE_FORMAT)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(err)))
}
