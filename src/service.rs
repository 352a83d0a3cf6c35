use std::path::PathBuf;

use chrono::Local;
use rusqlite::TransactionBehavior;

use crate::db::{Database, TodoRepository};
use crate::error::TodoError;
use crate::models::{NewTodo, Todo, MAX_UNFINISHED_COUNT};

/// Business rules over the todo table. Each public call runs in its own
/// transaction on a fresh connection.
#[derive(Debug, Clone)]
pub struct TodoService {
    db_path: PathBuf,
}

impl TodoService {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn find_one(&self, id: i64) -> Result<Todo, TodoError> {
        self.in_transaction(TransactionBehavior::Deferred, |repo| find_existing(repo, id))
    }

    pub fn find_all(&self) -> Result<Vec<Todo>, TodoError> {
        self.in_transaction(TransactionBehavior::Deferred, |repo| Ok(repo.find_all()?))
    }

    pub fn create(&self, input: NewTodo) -> Result<Todo, TodoError> {
        self.in_transaction(TransactionBehavior::Immediate, |repo| {
            let unfinished = repo.count_by_finished(false)?;
            if unfinished >= MAX_UNFINISHED_COUNT {
                tracing::info!(unfinished, "rejecting create, unfinished cap reached");
                return Err(TodoError::unfinished_cap_reached());
            }

            let mut todo = Todo::new(input.title, Local::now().naive_local());
            repo.insert(&mut todo)?;
            tracing::debug!(id = todo.id, "created todo");
            Ok(todo)
        })
    }

    pub fn finish(&self, id: i64) -> Result<Todo, TodoError> {
        self.in_transaction(TransactionBehavior::Immediate, |repo| {
            let mut todo = find_existing(repo, id)?;
            if todo.finished {
                tracing::info!(id, "rejecting finish, todo already finished");
                return Err(TodoError::already_finished(id));
            }

            repo.mark_finished(id)?;
            todo.finished = true;
            tracing::debug!(id, "finished todo");
            Ok(todo)
        })
    }

    pub fn delete(&self, id: i64) -> Result<(), TodoError> {
        self.in_transaction(TransactionBehavior::Immediate, |repo| {
            find_existing(repo, id)?;
            repo.delete_by_id(id)?;
            tracing::debug!(id, "deleted todo");
            Ok(())
        })
    }

    /// Commits when `work` succeeds; dropping the transaction on error rolls
    /// it back.
    fn in_transaction<T>(
        &self,
        behavior: TransactionBehavior,
        work: impl FnOnce(&TodoRepository<'_>) -> Result<T, TodoError>,
    ) -> Result<T, TodoError> {
        let mut db = Database::open(&self.db_path)?;
        let tx = db.transaction(behavior)?;
        let value = work(&TodoRepository::new(&tx))?;
        tx.commit()?;
        Ok(value)
    }
}

fn find_existing(repo: &TodoRepository<'_>, id: i64) -> Result<Todo, TodoError> {
    repo.find_by_id(id)?.ok_or(TodoError::NotFound { id })
}
