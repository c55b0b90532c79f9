pub mod flag;
pub mod redis;
