#![forbid(unsafe_code)]

pub mod json_file;
pub mod repository;
pub mod sqlite;
