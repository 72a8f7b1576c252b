pub mod cam;
pub mod derived;
pub mod lease_term;
pub mod rent_roll;
pub mod ti_amortization;
