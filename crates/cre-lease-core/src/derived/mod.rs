pub mod calculator;
pub mod record;
