//! Superblock 读取和验证

use alloc::vec;
use log::{debug, warn};

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    types::{ext2_sblock, IncompatFeatures, RoCompatFeatures},
};

/// 从镜像读取 superblock
///
/// # 参数
///
/// * `bdev` - 块设备引用
/// * `verify_magic` - 是否校验魔数
///
/// # 返回
///
/// 成功返回原始 superblock 结构
pub fn read_superblock<D: BlockDevice>(
    bdev: &BlockDev<D>,
    verify_magic: bool,
) -> Result<ext2_sblock> {
    let mut sb_buf = vec![0u8; EXT2_SUPERBLOCK_SIZE];

    // superblock 固定位于偏移 1024
    bdev.read_bytes(EXT2_SUPERBLOCK_OFFSET, &mut sb_buf)?;

    let sb = ext2_sblock::from_bytes(&sb_buf)?;

    if !sb.is_valid() {
        if verify_magic {
            return Err(Error::new(
                ErrorKind::Corrupted,
                "Invalid ext2 superblock magic number",
            ));
        }
        warn!("superblock magic {:#06x} ignored", sb.magic);
    }

    Ok(sb)
}

/// Superblock 包装器
///
/// 挂载时解码一次，之后在整个会话期间不可变。
#[derive(Debug, Clone)]
pub struct Superblock {
    inner: ext2_sblock,
    block_size: u32,
}

impl Superblock {
    /// 从镜像加载 superblock
    pub fn load<D: BlockDevice>(bdev: &BlockDev<D>, verify_magic: bool) -> Result<Self> {
        let inner = read_superblock(bdev, verify_magic)?;
        Self::new(inner)
    }

    /// 校验几何参数并包装
    ///
    /// 块大小必须在 [1024, 65536]，每组 inode 数和 inode 大小必须非零。
    pub fn new(inner: ext2_sblock) -> Result<Self> {
        let block_size = match inner.block_size() {
            Some(bs) if (EXT2_MIN_BLOCK_SIZE..=EXT2_MAX_BLOCK_SIZE).contains(&bs) => bs,
            _ => {
                return Err(Error::new(
                    ErrorKind::Corrupted,
                    "superblock block size out of range",
                ))
            }
        };

        if inner.inodes_per_group == 0 {
            return Err(Error::new(
                ErrorKind::Corrupted,
                "superblock has zero inodes per group",
            ));
        }

        if inner.inode_size() == 0 {
            return Err(Error::new(
                ErrorKind::Corrupted,
                "superblock has zero inode size",
            ));
        }

        if (inner.inode_size() as usize) < EXT2_GOOD_OLD_INODE_SIZE as usize {
            warn!(
                "inode size {} smaller than the 128-byte record, decoding may fail",
                inner.inode_size()
            );
        }

        debug!(
            "superblock: block_size={} inodes={} ipg={} inode_size={} rev={}",
            block_size,
            inner.inodes_count,
            inner.inodes_per_group,
            inner.inode_size(),
            inner.rev_level
        );

        Ok(Self { inner, block_size })
    }

    /// 获取内部 superblock 结构的引用
    pub fn inner(&self) -> &ext2_sblock {
        &self.inner
    }

    /// 获取块大小
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// 每个指针块包含的块号数量
    pub fn pointers_per_block(&self) -> u32 {
        self.block_size / EXT2_BLOCK_POINTER_SIZE as u32
    }

    /// 获取 inode 大小
    pub fn inode_size(&self) -> u16 {
        self.inner.inode_size()
    }

    /// 获取总块数
    pub fn blocks_count(&self) -> u32 {
        self.inner.blocks_count
    }

    /// 获取空闲块数
    pub fn free_blocks_count(&self) -> u32 {
        self.inner.free_blocks_count
    }

    /// 获取总 inode 数
    pub fn inodes_count(&self) -> u32 {
        self.inner.inodes_count
    }

    /// 获取空闲 inode 数
    pub fn free_inodes_count(&self) -> u32 {
        self.inner.free_inodes_count
    }

    /// 获取每组块数
    pub fn blocks_per_group(&self) -> u32 {
        self.inner.blocks_per_group
    }

    /// 获取每组 inode 数
    pub fn inodes_per_group(&self) -> u32 {
        self.inner.inodes_per_group
    }

    /// 获取块组数量
    pub fn block_group_count(&self) -> u32 {
        self.inner.block_group_count()
    }

    /// 获取第一个数据块
    pub fn first_data_block(&self) -> u32 {
        self.inner.first_data_block
    }

    /// 版本级别
    pub fn rev_level(&self) -> u32 {
        self.inner.rev_level
    }

    /// 不兼容特性集合（保留未知位）
    pub fn incompat_features(&self) -> IncompatFeatures {
        IncompatFeatures::from_bits_retain(self.inner.feature_incompat)
    }

    /// 只读兼容特性集合
    pub fn ro_compat_features(&self) -> RoCompatFeatures {
        RoCompatFeatures::from_bits_retain(self.inner.feature_ro_compat)
    }

    /// 普通文件大小是否使用 size_high（rev 1 且带 LARGE_FILE）
    pub fn has_large_file(&self) -> bool {
        self.rev_level() >= EXT2_DYNAMIC_REV
            && self
                .ro_compat_features()
                .contains(RoCompatFeatures::LARGE_FILE)
    }

    /// 目录项是否带 file_type 字段
    pub fn has_filetype(&self) -> bool {
        self.incompat_features().contains(IncompatFeatures::FILETYPE)
    }

    /// 本实现无法解释的不兼容特性
    pub fn unsupported_incompat(&self) -> IncompatFeatures {
        self.incompat_features()
            .difference(IncompatFeatures::supported())
    }

    /// 获取卷名称（UTF-8 字符串）
    pub fn volume_name(&self) -> Option<&str> {
        let len = self
            .inner
            .volume_name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.inner.volume_name.len());

        core::str::from_utf8(&self.inner.volume_name[..len]).ok()
    }

    /// 验证文件系统状态
    pub fn is_clean(&self) -> bool {
        const EXT2_VALID_FS: u16 = 0x0001;
        (self.inner.state & EXT2_VALID_FS) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemDevice;
    use byteorder::{ByteOrder, LittleEndian};

    fn raw_sb(log_block_size: u32) -> ext2_sblock {
        ext2_sblock {
            inodes_count: 64,
            blocks_count: 1000,
            inodes_per_group: 32,
            blocks_per_group: 8192,
            log_block_size,
            magic: EXT2_SUPERBLOCK_MAGIC,
            rev_level: EXT2_DYNAMIC_REV,
            inode_size: 128,
            state: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_superblock_validation() {
        let mut sb = ext2_sblock::default();
        assert!(!sb.is_valid());

        sb.magic = EXT2_SUPERBLOCK_MAGIC;
        assert!(sb.is_valid());
    }

    #[test]
    fn test_superblock_helpers() {
        let sb = Superblock::new(raw_sb(2)).unwrap();
        assert_eq!(sb.block_size(), 4096);
        assert_eq!(sb.pointers_per_block(), 1024);
        assert_eq!(sb.block_group_count(), 2);
        assert!(sb.is_clean());
    }

    #[test]
    fn test_large_file_feature() {
        let mut raw = raw_sb(0);
        assert!(!Superblock::new(raw).unwrap().has_large_file());

        raw.feature_ro_compat = RoCompatFeatures::LARGE_FILE.bits();
        assert!(Superblock::new(raw).unwrap().has_large_file());

        // rev 0 没有特性字段
        raw.rev_level = EXT2_GOOD_OLD_REV;
        assert!(!Superblock::new(raw).unwrap().has_large_file());
    }

    #[test]
    fn test_block_size_out_of_range() {
        let err = Superblock::new(raw_sb(7)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
    }

    #[test]
    fn test_zero_inodes_per_group() {
        let mut raw = raw_sb(0);
        raw.inodes_per_group = 0;
        assert_eq!(
            Superblock::new(raw).unwrap_err().kind(),
            ErrorKind::Corrupted
        );
    }

    #[test]
    fn test_feature_sets() {
        let mut raw = raw_sb(0);
        raw.feature_incompat = (IncompatFeatures::FILETYPE | IncompatFeatures::EXTENTS).bits();
        let sb = Superblock::new(raw).unwrap();
        assert!(sb.has_filetype());
        assert_eq!(sb.unsupported_incompat(), IncompatFeatures::EXTENTS);
    }

    #[test]
    fn test_bad_magic_on_image() {
        let mut image = alloc::vec![0u8; 4096];
        LittleEndian::write_u16(&mut image[1024 + 56..], 0x1234);
        let bdev = BlockDev::new(MemDevice::new(image));

        let err = read_superblock(&bdev, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
        assert!(read_superblock(&bdev, false).is_ok());
    }
}
