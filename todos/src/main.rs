//! Command-line demo: load the remote todo list and print its sections.
//!
//! Usage: `todo-sections [All|Done|UnDone]`
//!
//! The backend is selected with `TODOS_ENV`, `TODOS_API_URL` and
//! `TODOS_API_TIMEOUT_SECS`.

use std::sync::Arc;
use std::time::Duration;
use todo_sections::{TodoList, TodoListConfig, TodosState};
use todo_sections_core::filter::FilterType;
use todo_sections_http::HttpTodoApi;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_sections(state: &TodosState) {
    for section in state.visible_sections() {
        let marker = if section.expanded { "v" } else { ">" };
        println!("{marker} {} ({})", section.title, section.len());
        if section.expanded {
            for todo in &section.items {
                let status = if todo.completed { "x" } else { " " };
                println!("    [{status}] #{} {}", todo.id, todo.title);
            }
        }
    }
    println!(
        "\n{} shown | All {} / Done {} / UnDone {}",
        state.visible_count(),
        state.count(FilterType::All),
        state.count(FilterType::Done),
        state.count(FilterType::UnDone)
    );
}

/// Stops the list, logging effects that did not finish in time
///
/// Returns `true` on a clean shutdown.
async fn shut_down(list: &TodoList, timeout: Duration) -> bool {
    match list.shutdown(timeout).await {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(%error, "Shutdown did not complete cleanly");
            false
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_sections=debug,todo_sections_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let filter = match std::env::args().nth(1) {
        Some(name) => name.parse::<FilterType>()?,
        None => FilterType::All,
    };

    let api = HttpTodoApi::from_env()?;
    tracing::info!(base_url = api.base_url(), "Using todo backend");

    let list = TodoList::new(Arc::new(api), TodoListConfig::default());
    let mut notices = list.notifications();

    if let Err(error) = list.fetch_all().await {
        if let Ok(notice) = notices.try_recv() {
            eprintln!("{notice}");
        }
        let state = list.snapshot();
        if let Some(info) = &state.error {
            eprintln!("[{}] {}", info.code, info.message);
        }
        return Err(error.into());
    }

    list.set_filter(filter).await?;
    println!("=== Todos ({filter}) ===\n");
    print_sections(&list.snapshot());

    shut_down(&list, Duration::from_secs(1)).await;
    Ok(())
}
