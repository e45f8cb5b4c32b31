//! File operation tools confined to the project directory

pub mod delete;
pub mod modify;
pub mod read;
pub mod read_dir;
pub mod write;

pub use delete::{FileDeleteTool, PROTECTED_FILES};
pub use modify::FileModifyTool;
pub use read::FileReadTool;
pub use read_dir::ReadDirTool;
pub use write::FileWriteTool;
