pub mod classify;
pub mod compare;
pub mod compiler;
pub mod directive;
pub mod discover;
pub mod engine;
pub mod generate;
pub mod report;
pub mod schema;
pub mod types;
