//! 文件系统高级 API
//!
//! 这个模块提供只读 ext2 会话的全部操作接口。

mod file;
mod filesystem;
mod metadata;

#[cfg(feature = "std")]
pub use file::WriteSink;
pub use file::{dump_full, read_range, File, Sink};
pub use filesystem::{Ext2FileSystem, FsConfig};
pub use metadata::{FileMetadata, StatFs};
