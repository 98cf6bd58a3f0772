//! inode（索引节点）相关的宿主侧操作：属性、目录列举和文件内容。

// inode属性子模块
mod attr;
// 目录列举子模块
mod dir;
// 文件内容子模块
mod file;

pub use attr::FileAttr;
pub(crate) use attr::get_attr;
pub(crate) use dir::list_entries;
pub(crate) use file::{check_access, dump_target, read_window};

use ext2_core::{BlockDevice, Ext2FileSystem};

use crate::error::Result;

/// 导出目标：inode 编号或绝对路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Inode(u32),
    Path(&'a str),
}

impl From<u32> for Target<'_> {
    fn from(ino: u32) -> Self {
        Target::Inode(ino)
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(path: &'a str) -> Self {
        Target::Path(path)
    }
}

impl Target<'_> {
    /// 解析成 inode 编号
    pub(crate) fn resolve<D: BlockDevice>(self, fs: &Ext2FileSystem<D>) -> Result<u32> {
        match self {
            Target::Inode(ino) => Ok(ino),
            Target::Path(path) => fs.resolve_path(path),
        }
    }
}
