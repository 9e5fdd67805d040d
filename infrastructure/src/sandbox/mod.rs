//! Sandbox enforcement

mod path_guard;

pub use path_guard::PathGuard;
