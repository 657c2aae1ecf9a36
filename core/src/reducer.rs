//! The reducer trait.
//!
//! Reducers are pure functions `(State, Action, Environment) → (State, Effects)`.
//! All business rules for a feature live in its reducer; the runtime only
//! serializes calls and executes the returned effect descriptions.

use crate::effect::Effect;
use smallvec::SmallVec;

/// Business logic for one feature.
///
/// # Type Parameters
///
/// - `State`: The state this reducer owns
/// - `Action`: Every input the reducer understands (intents and outcomes)
/// - `Environment`: Injected dependencies (API client, clock)
///
/// # Example
///
/// ```
/// use todo_sections_core::{smallvec, Effect, Reducer, SmallVec};
///
/// #[derive(Clone, Debug, Default)]
/// struct Expanded(bool);
///
/// #[derive(Clone, Debug)]
/// enum Toggle {
///     Flip,
/// }
///
/// struct ToggleReducer;
///
/// impl Reducer for ToggleReducer {
///     type State = Expanded;
///     type Action = Toggle;
///     type Environment = ();
///
///     fn reduce(
///         &self,
///         state: &mut Expanded,
///         action: Toggle,
///         _env: &(),
///     ) -> SmallVec<[Effect<Toggle>; 4]> {
///         match action {
///             Toggle::Flip => state.0 = !state.0,
///         }
///         smallvec![Effect::None]
///     }
/// }
///
/// let mut state = Expanded::default();
/// ToggleReducer.reduce(&mut state, Toggle::Flip, &());
/// assert!(state.0);
/// ```
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// The environment type with injected dependencies
    type Environment;

    /// Reduce an action into state changes and effects
    ///
    /// Implementations must not perform I/O. Anything that talks to the
    /// outside world is returned as an [`Effect`] for the runtime to run.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]>;
}
