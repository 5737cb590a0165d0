pub mod announcement;
pub mod role;
