pub mod alert;
pub mod snapshot;
pub mod sprint;
pub mod ticket;
