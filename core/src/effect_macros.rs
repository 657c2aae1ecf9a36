//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block body
///
/// The body is moved into an `async move` block and must evaluate to
/// `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use todo_sections_core::async_effect;
///
/// let api = env.api.clone();
/// async_effect! {
///     Some(TodosAction::UsersLoaded {
///         fetch,
///         result: api.fetch_users().await,
///     })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` that dispatches an action later
///
/// # Example
///
/// ```rust,ignore
/// use todo_sections_core::delay;
///
/// delay! {
///     duration: Duration::from_secs(2),
///     action: TodosAction::DismissNotice { seq }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}
