pub mod iter;
pub mod schedule;
