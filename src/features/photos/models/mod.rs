mod photo;
mod photo_task;

pub use photo::Photo;
pub use photo_task::{add_task, remove_task, update_task, PhotoTask};
