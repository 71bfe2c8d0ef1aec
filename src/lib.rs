pub mod composition;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod generator;
pub mod guide;
pub mod library;
pub mod llm;
pub mod rotation;
pub mod template;
pub mod utils;
