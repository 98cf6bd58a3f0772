//! 宿主侧接口：把只读 ext2 引擎包装成返回负 errno 的调用约定，
//! 供虚拟文件系统前端直接转交给操作系统。

// 引入日志宏
#[macro_use]
extern crate log;

// 镜像打开
mod blockdev;
// 错误处理模块
mod error;
// 返回 errno 的对外接口
mod fs;
// inode（索引节点）相关模块
mod inode;

pub use blockdev::{open_image, open_image_with_config, Ext2Image};
pub use error::{neg_errno, Error, ErrorKind, Result};
pub use fs::*;
pub use inode::*;

// 引擎的常用类型
pub use ext2_core::{BlockDevice, Ext2FileSystem, FsConfig, InodeType, WalkMode};
