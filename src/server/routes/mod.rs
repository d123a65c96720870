mod questions;
mod users;

pub use questions::questions_router;
pub use users::users_router;
