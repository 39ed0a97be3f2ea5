//! Diagnostic output for verbose runs.

pub mod console;

pub use console::ConsoleOutput;
