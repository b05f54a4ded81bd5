pub mod event;
pub mod geo;
pub mod identifier;
pub mod reconcile;
pub mod result;
pub mod transition;
