pub mod advice;
pub mod guard;
pub mod habits;
pub mod progress;
pub mod tasks;

pub use advice::AdviceController;
pub use habits::{HabitController, HabitForm};
pub use progress::ProgressController;
pub use tasks::{TaskForm, TaskListController};
