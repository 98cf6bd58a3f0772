//! 目录操作模块
//!
//! 这个模块提供 ext2 目录项的解析、目录遍历和路径查找功能。

mod entry;
mod lookup;
mod reader;

pub use entry::*;
pub use lookup::*;
pub use reader::DirReader;
