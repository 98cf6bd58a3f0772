//! Inode 读取和操作

use alloc::vec;

use crate::{
    block::{BlockDev, BlockDevice},
    block_group::locate_inode,
    consts::*,
    error::Result,
    superblock::Superblock,
    types::{ext2_inode, InodeMode},
};

/// 从镜像读取 inode
///
/// # 参数
///
/// * `bdev` - 块设备引用
/// * `sb` - superblock 引用
/// * `inode_num` - inode 编号（从 1 开始）
///
/// # 返回
///
/// 成功返回 inode 结构
///
/// # 说明
///
/// 读取 `inode_size` 字节的完整记录，只解码前 128 字节。
pub fn read_inode<D: BlockDevice>(
    bdev: &BlockDev<D>,
    sb: &Superblock,
    inode_num: u32,
) -> Result<ext2_inode> {
    let inode_offset = locate_inode(bdev, sb, inode_num)?;

    let record_len = (sb.inode_size() as usize).max(EXT2_GOOD_OLD_INODE_SIZE as usize);
    let mut inode_buf = vec![0u8; record_len];
    bdev.read_bytes(inode_offset, &mut inode_buf)?;

    ext2_inode::from_bytes(&inode_buf)
}

/// inode 类型（mode 高 4 位）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InodeType {
    #[default]
    Unknown = 0,
    Fifo = 1,
    CharacterDevice = 2,
    Directory = 4,
    BlockDevice = 6,
    RegularFile = 8,
    Symlink = 10,
    Socket = 12,
}

impl From<u8> for InodeType {
    fn from(value: u8) -> Self {
        match value {
            1 => InodeType::Fifo,
            2 => InodeType::CharacterDevice,
            4 => InodeType::Directory,
            6 => InodeType::BlockDevice,
            8 => InodeType::RegularFile,
            10 => InodeType::Symlink,
            12 => InodeType::Socket,
            _ => InodeType::Unknown,
        }
    }
}

/// Inode 包装器
#[derive(Debug, Clone)]
pub struct Inode {
    inner: ext2_inode,
    inode_num: u32,
    /// size_high 是否参与普通文件大小
    large_file: bool,
}

impl Inode {
    /// 从镜像加载 inode
    ///
    /// # 参数
    ///
    /// * `bdev` - 块设备引用
    /// * `sb` - superblock 引用
    /// * `inode_num` - inode 编号
    pub fn load<D: BlockDevice>(
        bdev: &BlockDev<D>,
        sb: &Superblock,
        inode_num: u32,
    ) -> Result<Self> {
        let inner = read_inode(bdev, sb, inode_num)?;
        Ok(Self {
            inner,
            inode_num,
            large_file: sb.has_large_file(),
        })
    }

    /// 由已解码的记录构造，size_high 按 large_file 特性解释
    pub fn from_raw(inner: ext2_inode, inode_num: u32) -> Self {
        Self {
            inner,
            inode_num,
            large_file: true,
        }
    }

    /// 获取 inode 编号
    pub fn inode_num(&self) -> u32 {
        self.inode_num
    }

    /// 获取内部 inode 结构的引用
    pub fn inner(&self) -> &ext2_inode {
        &self.inner
    }

    /// 获取文件大小
    ///
    /// 没有 large_file 特性的镜像只使用低 32 位。
    pub fn file_size(&self) -> u64 {
        if self.large_file {
            self.inner.file_size()
        } else {
            self.inner.size as u64
        }
    }

    /// 获取文件模式（类型 + 权限）
    pub fn mode(&self) -> u16 {
        self.inner.mode
    }

    /// 文件类型
    pub fn inode_type(&self) -> InodeType {
        InodeType::from((self.inner.mode >> 12) as u8)
    }

    /// 权限位
    pub fn permissions(&self) -> InodeMode {
        InodeMode::from_bits_truncate(self.inner.mode)
    }

    /// 检查是否是目录
    pub fn is_dir(&self) -> bool {
        self.inner.is_dir()
    }

    /// 检查是否是普通文件
    pub fn is_file(&self) -> bool {
        self.inner.is_file()
    }

    /// 检查是否是符号链接
    pub fn is_symlink(&self) -> bool {
        self.inner.is_symlink()
    }

    /// 获取链接计数
    pub fn links_count(&self) -> u16 {
        self.inner.links_count
    }

    /// 获取占用的块数（512 字节为单位）
    pub fn blocks_count(&self) -> u64 {
        self.inner.blocks as u64
    }

    /// 获取标志
    pub fn flags(&self) -> u32 {
        self.inner.flags
    }

    /// 检查是否使用 extent
    pub fn has_extents(&self) -> bool {
        (self.flags() & EXT2_INODE_FLAG_EXTENTS) != 0
    }

    /// 获取直接块指针
    ///
    /// # 参数
    ///
    /// * `index` - 块索引（0-11）
    ///
    /// # 返回
    ///
    /// 块号，如果索引无效则返回 None
    pub fn get_direct_block(&self, index: usize) -> Option<u32> {
        if index < EXT2_INODE_DIRECT_BLOCKS {
            Some(self.inner.block[index])
        } else {
            None
        }
    }

    /// 获取间接块指针
    pub fn get_indirect_block(&self) -> u32 {
        self.inner.block[EXT2_INODE_INDIRECT_BLOCK]
    }

    /// 获取二级间接块指针
    pub fn get_double_indirect_block(&self) -> u32 {
        self.inner.block[EXT2_INODE_DOUBLE_INDIRECT_BLOCK]
    }

    /// 获取访问时间（秒）
    pub fn atime(&self) -> u32 {
        self.inner.atime
    }

    /// 获取 inode 改变时间（秒）
    pub fn ctime(&self) -> u32 {
        self.inner.ctime
    }

    /// 获取修改时间（秒）
    pub fn mtime(&self) -> u32 {
        self.inner.mtime
    }

    /// 获取 UID（用户 ID）
    pub fn uid(&self) -> u32 {
        (self.inner.uid as u32) | ((self.inner.uid_high as u32) << 16)
    }

    /// 获取 GID（组 ID）
    pub fn gid(&self) -> u32 {
        (self.inner.gid as u32) | ((self.inner.gid_high as u32) << 16)
    }
}
