use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Priority assigned to a task when the client does not pick one.
pub const DEFAULT_PRIORITY: i16 = 5;

/// Input structure for creating a task.
///
/// The owner is never part of the payload; it always comes from the
/// authenticated identity.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Importance on a 1 (low) to 10 (high) scale. Defaults to 5 when
    /// omitted; out-of-range values are rejected rather than clamped.
    #[validate(range(min = 1, max = 10))]
    pub priority: Option<i16>,
}

/// Partial update for a task. Omitted fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub completed: Option<bool>,

    #[validate(range(min = 1, max = 10))]
    pub priority: Option<i16>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// Identifier of the user who owns the task. Fixed at creation.
    pub owner_id: i32,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// Importance on the 1–10 scale.
    pub priority: i16,
    /// Whether the task is done.
    pub completed: bool,
    /// Timestamp of when the task was created; listing orders by it,
    /// newest first.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` from `TaskInput` and the owner's user id.
    /// Fills in the id, creation time, default priority, and the
    /// not-yet-completed state.
    pub fn new(input: TaskInput, owner_id: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: input.title,
            description: input.description,
            priority: input.priority.unwrap_or(DEFAULT_PRIORITY),
            completed: false,
            created_at: Utc::now(),
        }
    }
}
