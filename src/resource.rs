use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::TodoError;
use crate::models::{NewTodo, Todo};

pub const MAX_TITLE_CHARS: usize = 30;

/// Wire form of a todo as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResource {
    pub todo_id: i64,
    pub todo_title: String,
    pub finished: bool,
    #[serde(serialize_with = "wire_datetime::serialize")]
    pub created_at: NaiveDateTime,
}

impl From<Todo> for TodoResource {
    fn from(todo: Todo) -> Self {
        Self {
            todo_id: todo.id,
            todo_title: todo.title,
            finished: todo.finished,
            created_at: todo.created_at,
        }
    }
}

/// Body of `POST /todos`. Only `todoTitle` is bound; any other field a
/// client sends, including `null`s, is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub todo_title: Option<String>,
}

impl CreateTodoRequest {
    /// Checks the title and maps the request onto the create input.
    pub fn into_new_todo(self) -> Result<NewTodo, TodoError> {
        let title = self.todo_title.unwrap_or_default();
        if title.is_empty() {
            return Err(TodoError::Validation(
                "todoTitle must not be empty".to_string(),
            ));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(TodoError::Validation(format!(
                "todoTitle size must be between 1 and {MAX_TITLE_CHARS}"
            )));
        }
        Ok(NewTodo { title })
    }
}

mod wire_datetime {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    const WIRE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(WIRE_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::json;

    fn sample_todo() -> Todo {
        Todo {
            id: 1,
            title: "sample todo 1".to_string(),
            finished: false,
            created_at: NaiveDate::from_ymd_opt(2019, 9, 19)
                .and_then(|date| date.and_hms_nano_opt(1, 1, 1, 500_000_000))
                .unwrap(),
        }
    }

    #[test]
    fn serializes_with_camel_case_and_slash_timestamp() {
        let value = serde_json::to_value(TodoResource::from(sample_todo())).unwrap();

        assert_eq!(
            value,
            json!({
                "todoId": 1,
                "todoTitle": "sample todo 1",
                "finished": false,
                "createdAt": "2019/09/19 01:01:01",
            })
        );
    }

    #[test]
    fn request_with_only_a_title_deserializes() {
        let request: CreateTodoRequest =
            serde_json::from_value(json!({ "todoTitle": "sample todo 4" })).unwrap();

        assert_eq!(request.todo_title.as_deref(), Some("sample todo 4"));
    }

    #[rstest]
    #[case(json!({
        "todoId": 77,
        "todoTitle": "mine",
        "finished": true,
        "createdAt": "2000/01/01 00:00:00",
    }))]
    #[case(json!({
        "todoId": null,
        "todoTitle": "mine",
        "finished": null,
        "createdAt": null,
    }))]
    #[case(json!({
        "todoTitle": "mine",
        "finished": "yes",
        "createdAt": "not a date",
    }))]
    fn client_owned_fields_are_skipped(#[case] body: serde_json::Value) {
        let request: CreateTodoRequest = serde_json::from_value(body).unwrap();

        assert_eq!(
            request.into_new_todo().unwrap(),
            NewTodo {
                title: "mine".to_string()
            }
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("1234567890123456789012345678901"))]
    fn rejects_invalid_titles(#[case] title: Option<&str>) {
        let request = CreateTodoRequest {
            todo_title: title.map(str::to_string),
        };

        assert!(matches!(
            request.into_new_todo(),
            Err(TodoError::Validation(_))
        ));
    }

    #[test]
    fn null_title_is_a_validation_failure() {
        let request: CreateTodoRequest =
            serde_json::from_value(json!({ "todoTitle": null })).unwrap();

        assert!(matches!(
            request.into_new_todo(),
            Err(TodoError::Validation(_))
        ));
    }

    #[rstest]
    #[case("a")]
    #[case("123456789012345678901234567890")]
    #[case("ああああああああああああああああああああああああああああああ")]
    fn accepts_titles_up_to_thirty_chars(#[case] title: &str) {
        let request = CreateTodoRequest {
            todo_title: Some(title.to_string()),
        };

        assert_eq!(request.into_new_todo().unwrap().title, title);
    }
}
