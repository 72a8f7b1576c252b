pub mod allocation;
pub mod apply;
