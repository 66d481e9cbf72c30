pub mod commands;
pub mod logging;
pub mod repository;
pub mod settings;
pub mod task;

pub use commands::{CommandError, TaskService};
pub use repository::{JsonTaskRepository, RepositoryError, TaskRepository};
pub use settings::Settings;
pub use task::{Status, Task};
