//! 文件元数据与文件系统统计

use alloc::string::{String, ToString};

use crate::{
    consts::EXT2_NAME_LEN,
    inode::{Inode, InodeType},
    superblock::Superblock,
    types::InodeMode,
};

/// 文件元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// inode 编号
    pub inode_num: u32,
    /// 文件类型
    pub file_type: InodeType,
    /// 完整模式（类型 + 权限）
    pub mode: u16,
    /// 文件大小
    pub size: u64,
    pub uid: u32,
    pub gid: u32,
    /// 硬链接数
    pub nlink: u16,
    pub atime: u32,
    pub mtime: u32,
    pub ctime: u32,
    /// 占用的 512 字节扇区数
    pub blocks: u64,
    /// 文件系统块大小
    pub block_size: u32,
}

impl FileMetadata {
    pub fn from_inode(inode: &Inode, block_size: u32) -> Self {
        Self {
            inode_num: inode.inode_num(),
            file_type: inode.inode_type(),
            mode: inode.mode(),
            size: inode.file_size(),
            uid: inode.uid(),
            gid: inode.gid(),
            nlink: inode.links_count(),
            atime: inode.atime(),
            mtime: inode.mtime(),
            ctime: inode.ctime(),
            blocks: inode.blocks_count(),
            block_size,
        }
    }

    pub fn permissions(&self) -> InodeMode {
        InodeMode::from_bits_truncate(self.mode)
    }

    /// 去掉写权限位后的模式，供只读前端上报
    pub fn readonly_mode(&self) -> u16 {
        self.mode & !InodeMode::ALL_WRITE.bits()
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == InodeType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.file_type == InodeType::RegularFile
    }
}

/// 文件系统统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatFs {
    pub block_size: u32,
    pub blocks_count: u32,
    pub free_blocks_count: u32,
    pub inodes_count: u32,
    pub free_inodes_count: u32,
    pub name_max: u32,
    pub volume_name: String,
}

impl StatFs {
    pub fn from_superblock(sb: &Superblock) -> Self {
        Self {
            block_size: sb.block_size(),
            blocks_count: sb.blocks_count(),
            free_blocks_count: sb.free_blocks_count(),
            inodes_count: sb.inodes_count(),
            free_inodes_count: sb.free_inodes_count(),
            name_max: EXT2_NAME_LEN as u32,
            volume_name: sb.volume_name().unwrap_or("").to_string(),
        }
    }
}
