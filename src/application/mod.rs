pub mod commands;
pub mod handlers;
pub mod mediator;
pub mod queries;

#[cfg(test)]
mod handlers_tests;
