#![forbid(unsafe_code)]

pub mod generate;
pub mod process_generator;
pub mod shared_session;
