//! Optimistic list synchronization: a pure reducer with a reconciliation queue
//! ([`ListState`]) and the reactive controller that feeds it ([`ListController`]).

mod controller;
mod list_state;

pub(crate) use controller::ListController;
pub(crate) use list_state::ListState;
