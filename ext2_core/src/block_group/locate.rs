//! inode 编号到镜像字节偏移的映射

use log::trace;

use super::BlockGroup;
use crate::{
    block::{BlockDev, BlockDevice},
    error::{Error, ErrorKind, Result},
    superblock::Superblock,
};

/// 计算 inode 记录在镜像中的字节偏移
///
/// `group = (n-1) / inodes_per_group`，
/// `offset = block_size * inode_table + ((n-1) % inodes_per_group) * inode_size`。
///
/// # 错误
///
/// * `InvalidInput` - inode 编号为 0 或超过 inode 总数
/// * `Io` - 描述符读取失败
pub fn locate_inode<D: BlockDevice>(
    bdev: &BlockDev<D>,
    sb: &Superblock,
    inode_num: u32,
) -> Result<u64> {
    if inode_num == 0 || inode_num > sb.inodes_count() {
        return Err(Error::new(ErrorKind::InvalidInput, "inode number out of range"));
    }

    let ipg = sb.inodes_per_group();
    let group = (inode_num - 1) / ipg;
    let index = (inode_num - 1) % ipg;

    let bg = BlockGroup::load(bdev, sb, group)?;

    let offset = bg.inode_table_first_block() as u64 * sb.block_size() as u64
        + index as u64 * sb.inode_size() as u64;

    trace!("inode {inode_num}: group {group} index {index} at {offset:#x}");

    Ok(offset)
}
