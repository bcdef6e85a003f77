pub mod check;
pub mod tasks;
