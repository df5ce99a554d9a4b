pub mod announcement;
pub mod course;
pub mod material;
pub mod notification;
pub mod role;
pub mod subscriber;

pub use announcement::*;
pub use course::*;
pub use material::*;
pub use notification::*;
pub use role::*;
pub use subscriber::*;
