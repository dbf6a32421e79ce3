//! CLI commands for scigrade

pub mod dispatch;
pub mod evaluate;
pub mod input;
pub mod interactive;
pub mod prompt;
pub mod render;
pub mod rubric;
