pub mod ids;
pub mod naming;
