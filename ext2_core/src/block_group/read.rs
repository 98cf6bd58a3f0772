//! 块组描述符读取和查询操作

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    superblock::Superblock,
    types::ext2_group_desc,
};

/// 块组描述符的字节偏移
///
/// 描述符表紧跟在第一个数据块之后：`block_size * (first_data_block + 1)`。
pub fn group_desc_offset(sb: &Superblock, group_num: u32) -> u64 {
    let block_size = sb.block_size() as u64;
    let gdt_block = sb.first_data_block() as u64 + 1;
    gdt_block * block_size + (group_num as u64) * EXT2_GROUP_DESC_SIZE as u64
}

/// 读取块组描述符
///
/// # 参数
///
/// * `bdev` - 块设备引用
/// * `sb` - superblock 引用
/// * `group_num` - 块组编号
///
/// # 返回
///
/// 成功返回块组描述符
pub fn read_block_group_desc<D: BlockDevice>(
    bdev: &BlockDev<D>,
    sb: &Superblock,
    group_num: u32,
) -> Result<ext2_group_desc> {
    if group_num >= sb.block_group_count() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "block group index out of range",
        ));
    }

    let mut desc_buf = [0u8; EXT2_GROUP_DESC_SIZE];
    bdev.read_bytes(group_desc_offset(sb, group_num), &mut desc_buf)?;

    ext2_group_desc::from_bytes(&desc_buf)
}

/// BlockGroup 包装器
#[derive(Debug, Clone)]
pub struct BlockGroup {
    pub(super) inner: ext2_group_desc,
    pub(super) group_num: u32,
}

impl BlockGroup {
    /// 从镜像加载块组描述符
    pub fn load<D: BlockDevice>(
        bdev: &BlockDev<D>,
        sb: &Superblock,
        group_num: u32,
    ) -> Result<Self> {
        let inner = read_block_group_desc(bdev, sb, group_num)?;
        Ok(Self { inner, group_num })
    }

    /// 获取块组编号
    pub fn group_num(&self) -> u32 {
        self.group_num
    }

    /// 获取内部块组描述符结构的引用
    pub fn inner(&self) -> &ext2_group_desc {
        &self.inner
    }

    /// 获取块位图块号
    pub fn block_bitmap(&self) -> u32 {
        self.inner.block_bitmap
    }

    /// 获取 inode 位图块号
    pub fn inode_bitmap(&self) -> u32 {
        self.inner.inode_bitmap
    }

    /// 获取 inode 表起始块号
    pub fn inode_table_first_block(&self) -> u32 {
        self.inner.inode_table
    }

    pub fn free_blocks_count(&self) -> u16 {
        self.inner.free_blocks_count
    }

    pub fn free_inodes_count(&self) -> u16 {
        self.inner.free_inodes_count
    }

    pub fn used_dirs_count(&self) -> u16 {
        self.inner.used_dirs_count
    }
}
