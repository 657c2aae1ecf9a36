//! # Todo Sections HTTP
//!
//! [`TodoApi`](todo_sections_core::environment::TodoApi) over HTTP using `reqwest`.
//!
//! ## Example
//!
//! ```no_run
//! use todo_sections_core::environment::TodoApi;
//! use todo_sections_http::{ApiConfig, HttpTodoApi};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpTodoApi::new(&ApiConfig::from_env()?)?;
//! let users = api.fetch_users().await?;
//! let todos = api.fetch_todos(None).await?;
//! println!("{} users, {} todos", users.len(), todos.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;

pub use client::HttpTodoApi;
pub use config::{ApiConfig, ConfigError, Environment};
