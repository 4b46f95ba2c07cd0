pub mod graank;
pub mod search;
pub mod temporal;
pub mod time_lag;
