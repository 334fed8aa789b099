pub mod task;
pub mod user;

pub use task::{Task, TaskChanges, TaskInput, TaskStatus, TaskView};
pub use user::{normalize_email, NewUser, Role, User, UserRecord};
