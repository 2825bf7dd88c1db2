mod appointment;
mod notification;
mod user;

pub use appointment::*;
pub use notification::*;
pub use user::*;
