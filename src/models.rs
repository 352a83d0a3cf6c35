use chrono::NaiveDateTime;

/// Upper bound on todos that may be open at the time a new one is created.
pub const MAX_UNFINISHED_COUNT: i64 = 5;

/// A persisted todo row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    /// Assigned by the store on insert; `0` until then.
    pub id: i64,
    pub title: String,
    pub finished: bool,
    pub created_at: NaiveDateTime,
}

impl Todo {
    /// Builds an unsaved, unfinished todo stamped with `created_at`.
    pub fn new(title: impl Into<String>, created_at: NaiveDateTime) -> Self {
        Self {
            id: 0,
            title: title.into(),
            finished: false,
            created_at,
        }
    }
}

/// Input accepted by the create operation. Only the title is taken from the
/// client; id, status and timestamp are owned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
}
