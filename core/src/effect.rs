//! Side effect descriptions.
//!
//! Effects are values returned by reducers. They are never executed by the
//! reducer itself; the runtime `Store` interprets them and feeds any action
//! they produce back into the reducer.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future produced by an [`Effect::Future`]
pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

/// Describes a side effect to be executed by the runtime
///
/// # Type Parameters
///
/// - `Action`: The action type that effects can produce (feedback loop)
pub enum Effect<Action> {
    /// No-op effect
    None,

    /// Run effects concurrently
    Parallel(Vec<Effect<Action>>),

    /// Run effects one after another, each to completion
    Sequential(Vec<Effect<Action>>),

    /// Dispatch an action after a delay
    Delay {
        /// How long to wait
        duration: Duration,
        /// Action to dispatch after the delay
        action: Box<Action>,
    },

    /// Arbitrary async computation
    ///
    /// If the future resolves to `Some(action)`, the action is fed back into
    /// the reducer.
    Future(EffectFuture<Action>),
}

// Futures are opaque, so Debug is written by hand
impl<Action> std::fmt::Debug for Effect<Action>
where
    Action: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "Effect::None"),
            Self::Parallel(effects) => f.debug_tuple("Effect::Parallel").field(effects).finish(),
            Self::Sequential(effects) => {
                f.debug_tuple("Effect::Sequential").field(effects).finish()
            },
            Self::Delay { duration, action } => f
                .debug_struct("Effect::Delay")
                .field("duration", duration)
                .field("action", action)
                .finish(),
            Self::Future(_) => write!(f, "Effect::Future(<future>)"),
        }
    }
}

impl<Action> Effect<Action> {
    /// Combine effects to run in parallel
    #[must_use]
    pub const fn merge(effects: Vec<Self>) -> Self {
        Self::Parallel(effects)
    }

    /// Chain effects to run sequentially
    #[must_use]
    pub const fn chain(effects: Vec<Self>) -> Self {
        Self::Sequential(effects)
    }

    /// Wrap a future that may produce a follow-up action
    pub fn future<F>(fut: F) -> Self
    where
        F: Future<Output = Option<Action>> + Send + 'static,
    {
        Self::Future(Box::pin(fut))
    }

    /// Returns `true` for [`Effect::None`]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
