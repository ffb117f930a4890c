pub mod best_keywords;
pub mod config;

pub use best_keywords::{best_keywords, render};
pub use config::find_repository;

pub type KwToolResult<T> = anyhow::Result<T>;
