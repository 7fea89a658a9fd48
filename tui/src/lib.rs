//! praxis TUI - Terminal interface for narrated lessons
//!
//! This crate provides a full-screen terminal UI over the narrator core:
//! browse and search a technology's element catalog, play each element's
//! narrated step-by-step lesson, and answer the trailing exercises.
//!
//! # Architecture
//!
//! - **App**: event loop bridging terminal events to sequencer controls
//! - **Display**: view-model state derived from the narrator core
//! - **Screens**: browse, lesson, and exercise renderers
//! - **Widgets**: borderless scrollable text blocks with a typing cursor

pub mod app;
pub mod display;
pub mod screens;
pub mod theme;
pub mod widgets;

pub use app::App;
