//! ext2_core: read-only ext2 image engine
//!
//! 从原始镜像中解析 superblock、块组描述符、inode 和目录项，
//! 按路径查找文件，导出整个文件或读取任意字节区间（支持稀疏文件）。

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

// 公共模块
pub mod block;
pub mod block_group;
pub mod block_map;
pub mod consts;
pub mod dir;
pub mod error;
pub mod fs;
pub mod inode;
pub mod superblock;
pub mod types;

// 重新导出常用类型
pub use consts::*;
pub use error::{Error, ErrorKind, Result};
pub use types::*;

// 重新导出核心API
#[cfg(all(feature = "std", unix))]
pub use block::FileDevice;
pub use block::{BlockDev, BlockDevice, MemDevice};
pub use block_map::{BlockMap, BlockSlot, WalkMode};
pub use dir::{DirEntry, DirEntryIter, DirReader, FileType};
#[cfg(feature = "std")]
pub use fs::WriteSink;
pub use fs::{Ext2FileSystem, File, FileMetadata, FsConfig, Sink, StatFs};
pub use inode::{Inode, InodeType};
pub use superblock::Superblock;
