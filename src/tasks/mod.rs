pub mod counts;
pub mod filter;
pub mod fixtures;
pub mod model;
pub mod store;

pub use counts::{TaskBreakdown, TaskCounts};
pub use filter::TaskFilter;
pub use model::{Attachment, Comment, NewTask, Subtask, Task, TaskPatch, TaskPriority, TaskStatus};
pub use store::TaskStore;
