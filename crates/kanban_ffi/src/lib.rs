//! UI-facing bindings for the Kanban board core.

pub mod api;
