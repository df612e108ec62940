pub mod env;
pub mod observer;
