pub mod error;
pub mod todo_service;
mod todo_service_tests;
