pub mod input;
pub mod job;
pub mod route;
pub mod schedule;
pub mod upstream;
