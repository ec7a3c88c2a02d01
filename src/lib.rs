// mdblocks library - markdown block rendering with copyable code blocks
//
// The binary (src/main.rs) wires these together; integrators can use the
// document → render → layout path on its own.

pub mod clipboard;
pub mod config;
pub mod document;
pub mod logging;
pub mod render;
pub mod theme;
pub mod tui;
