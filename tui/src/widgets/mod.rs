//! Reusable widgets for the lesson viewer.

pub mod text_block;

pub use text_block::{TextBlock, TextBlockState};
