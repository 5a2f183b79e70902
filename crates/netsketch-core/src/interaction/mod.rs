// ── Canvas interaction ──
//
// Selection, drag and the connect-then-confirm protocol. `state` holds the
// pure transition table; `controller` applies its effects to the store.

mod controller;
mod state;

pub use controller::InteractionController;
pub use state::{Effect, Gesture, InteractionState, Transition, transition};
