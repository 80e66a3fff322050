mod actions;
pub mod entity;

pub use actions::*;
