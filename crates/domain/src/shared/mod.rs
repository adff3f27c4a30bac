pub mod entity;
pub mod timezone;
