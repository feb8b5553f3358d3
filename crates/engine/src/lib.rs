pub mod ids;
pub mod payroll;
pub mod reading;
pub mod schedule;
pub mod timegrid;
