//! 该模块把 inode 元数据转换成宿主 `stat` 所需的属性。

use core::time::Duration;

use ext2_core::{BlockDevice, Ext2FileSystem, FileMetadata, InodeType};

use crate::error::Result;

/// 文件系统节点的元数据（属性）
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileAttr {
    /// 包含文件的设备ID
    pub device: u64,
    /// inode编号
    pub ino: u32,
    /// 硬链接数量
    pub nlink: u64,
    /// 模式（类型 + 权限），写权限位已清除
    pub mode: u32,
    /// 节点类型（文件/目录/链接等）
    pub node_type: InodeType,
    /// 所有者用户ID
    pub uid: u32,
    /// 所有者组ID
    pub gid: u32,
    /// 文件大小（字节）
    pub size: u64,
    /// 文件系统I/O块大小
    pub block_size: u64,
    /// 分配的512B块数量
    pub blocks: u64,

    /// 最后访问时间
    pub atime: Duration,
    /// 最后修改时间
    pub mtime: Duration,
    /// 最后状态修改时间
    pub ctime: Duration,
}

impl From<&FileMetadata> for FileAttr {
    fn from(md: &FileMetadata) -> Self {
        Self {
            device: 0,
            ino: md.inode_num,
            nlink: md.nlink as u64,
            mode: md.readonly_mode() as u32,
            node_type: md.file_type,
            uid: md.uid,
            gid: md.gid,
            size: md.size,
            block_size: md.block_size as u64,
            blocks: md.blocks,
            atime: decode_time(md.atime),
            mtime: decode_time(md.mtime),
            ctime: decode_time(md.ctime),
        }
    }
}

/// ext2 只存 32 位秒
fn decode_time(time: u32) -> Duration {
    Duration::from_secs(time as u64)
}

/// 读取 inode 的属性
pub(crate) fn get_attr<D: BlockDevice>(fs: &Ext2FileSystem<D>, ino: u32) -> Result<FileAttr> {
    let md = fs.stat(ino)?;
    Ok(FileAttr::from(&md))
}
