//! Inode 操作模块
//!
//! 这个模块提供 ext2 inode 的定位、读取和字段访问。

mod read;

pub use read::*;
