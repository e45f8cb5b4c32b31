//! Sitegen agent tools
//!
//! - `file_ops`: sandboxed file tools (ReadDir, FileRead, FileWrite, FileModify, FileDelete)
//! - `exit`: the terminal Exit tool

pub mod exit;
pub mod file_ops;

pub use exit::ExitTool;
pub use file_ops::{FileDeleteTool, FileModifyTool, FileReadTool, FileWriteTool, ReadDirTool};
