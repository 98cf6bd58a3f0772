//! ext2 磁盘数据结构
//!
//! 设计原则：
//! 1. 结构体名、字段名沿用 C 定义（ext2_fs.h），便于对照磁盘布局
//! 2. 解码全部通过 byteorder 按小端读取，不做指针强转
//! 3. 只解码只读引擎会用到的前缀字段

// 允许C风格命名（这是有意为之，便于对照C代码实现）
#![allow(non_camel_case_types)]

use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};

use crate::{
    consts::*,
    error::{Error, ErrorKind, Result},
};

/// 确认缓冲区长度足够解码
fn ensure_len(buf: &[u8], needed: usize, what: &'static str) -> Result<()> {
    if buf.len() < needed {
        return Err(Error::new(ErrorKind::InvalidInput, what));
    }
    Ok(())
}

/// Superblock 结构
///
/// 对应C定义: struct ext2_super_block
#[derive(Debug, Clone, Copy, Default)]
pub struct ext2_sblock {
    pub inodes_count: u32,           // 0: 总 inode 数
    pub blocks_count: u32,           // 4: 总块数
    pub r_blocks_count: u32,         // 8: 保留块数
    pub free_blocks_count: u32,      // 12: 空闲块数
    pub free_inodes_count: u32,      // 16: 空闲 inode 数
    pub first_data_block: u32,       // 20: 第一个数据块
    pub log_block_size: u32,         // 24: 块大小（1024 << log_block_size）
    pub log_frag_size: u32,          // 28: 片段大小
    pub blocks_per_group: u32,       // 32: 每组块数
    pub frags_per_group: u32,        // 36: 每组片段数
    pub inodes_per_group: u32,       // 40: 每组 inode 数
    pub mtime: u32,                  // 44: 挂载时间
    pub wtime: u32,                  // 48: 写入时间
    pub mnt_count: u16,              // 52: 挂载次数
    pub max_mnt_count: u16,          // 54: 最大挂载次数
    pub magic: u16,                  // 56: 魔数 (0xEF53)
    pub state: u16,                  // 58: 文件系统状态
    pub errors: u16,                 // 60: 错误处理方式
    pub minor_rev_level: u16,        // 62: 次版本号
    pub lastcheck: u32,              // 64: 最后检查时间
    pub checkinterval: u32,          // 68: 检查间隔
    pub creator_os: u32,             // 72: 创建者操作系统
    pub rev_level: u32,              // 76: 版本级别
    pub def_resuid: u16,             // 80: 默认保留 uid
    pub def_resgid: u16,             // 82: 默认保留 gid

    // EXT2_DYNAMIC_REV 字段
    pub first_ino: u32,              // 84: 第一个非保留 inode
    pub inode_size: u16,             // 88: inode 大小
    pub block_group_nr: u16,         // 90: 本超级块所在的块组号
    pub feature_compat: u32,         // 92: 兼容特性
    pub feature_incompat: u32,       // 96: 不兼容特性
    pub feature_ro_compat: u32,      // 100: 只读兼容特性
    pub uuid: [u8; 16],              // 104: 卷 UUID
    pub volume_name: [u8; 16],       // 120: 卷名
}

/// 解码需要的最小字节数
const SBLOCK_DECODED_LEN: usize = 136;

impl ext2_sblock {
    /// 从原始字节解码（至少 136 字节）
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        ensure_len(buf, SBLOCK_DECODED_LEN, "superblock buffer too short")?;

        let mut uuid = [0u8; 16];
        uuid.copy_from_slice(&buf[104..120]);
        let mut volume_name = [0u8; 16];
        volume_name.copy_from_slice(&buf[120..136]);

        Ok(Self {
            inodes_count: LittleEndian::read_u32(&buf[0..]),
            blocks_count: LittleEndian::read_u32(&buf[4..]),
            r_blocks_count: LittleEndian::read_u32(&buf[8..]),
            free_blocks_count: LittleEndian::read_u32(&buf[12..]),
            free_inodes_count: LittleEndian::read_u32(&buf[16..]),
            first_data_block: LittleEndian::read_u32(&buf[20..]),
            log_block_size: LittleEndian::read_u32(&buf[24..]),
            log_frag_size: LittleEndian::read_u32(&buf[28..]),
            blocks_per_group: LittleEndian::read_u32(&buf[32..]),
            frags_per_group: LittleEndian::read_u32(&buf[36..]),
            inodes_per_group: LittleEndian::read_u32(&buf[40..]),
            mtime: LittleEndian::read_u32(&buf[44..]),
            wtime: LittleEndian::read_u32(&buf[48..]),
            mnt_count: LittleEndian::read_u16(&buf[52..]),
            max_mnt_count: LittleEndian::read_u16(&buf[54..]),
            magic: LittleEndian::read_u16(&buf[56..]),
            state: LittleEndian::read_u16(&buf[58..]),
            errors: LittleEndian::read_u16(&buf[60..]),
            minor_rev_level: LittleEndian::read_u16(&buf[62..]),
            lastcheck: LittleEndian::read_u32(&buf[64..]),
            checkinterval: LittleEndian::read_u32(&buf[68..]),
            creator_os: LittleEndian::read_u32(&buf[72..]),
            rev_level: LittleEndian::read_u32(&buf[76..]),
            def_resuid: LittleEndian::read_u16(&buf[80..]),
            def_resgid: LittleEndian::read_u16(&buf[82..]),
            first_ino: LittleEndian::read_u32(&buf[84..]),
            inode_size: LittleEndian::read_u16(&buf[88..]),
            block_group_nr: LittleEndian::read_u16(&buf[90..]),
            feature_compat: LittleEndian::read_u32(&buf[92..]),
            feature_incompat: LittleEndian::read_u32(&buf[96..]),
            feature_ro_compat: LittleEndian::read_u32(&buf[100..]),
            uuid,
            volume_name,
        })
    }

    /// 检查魔数
    pub fn is_valid(&self) -> bool {
        self.magic == EXT2_SUPERBLOCK_MAGIC
    }

    /// 块大小；log_block_size 异常时返回 None
    pub fn block_size(&self) -> Option<u32> {
        if self.log_block_size > 6 {
            return None;
        }
        Some(EXT2_MIN_BLOCK_SIZE << self.log_block_size)
    }

    /// inode 记录大小（rev 0 固定为 128）
    pub fn inode_size(&self) -> u16 {
        if self.rev_level == EXT2_GOOD_OLD_REV {
            EXT2_GOOD_OLD_INODE_SIZE
        } else {
            self.inode_size
        }
    }

    /// 块组数量
    pub fn block_group_count(&self) -> u32 {
        if self.inodes_per_group == 0 {
            return 0;
        }
        self.inodes_count.div_ceil(self.inodes_per_group)
    }
}

/// 块组描述符
///
/// 对应C定义: struct ext2_group_desc
#[derive(Debug, Clone, Copy, Default)]
pub struct ext2_group_desc {
    pub block_bitmap: u32,           // 0: 块位图块号
    pub inode_bitmap: u32,           // 4: inode 位图块号
    pub inode_table: u32,            // 8: inode 表起始块号
    pub free_blocks_count: u16,      // 12: 空闲块数
    pub free_inodes_count: u16,      // 14: 空闲 inode 数
    pub used_dirs_count: u16,        // 16: 目录数
}

impl ext2_group_desc {
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        ensure_len(buf, EXT2_GROUP_DESC_SIZE, "group descriptor buffer too short")?;

        Ok(Self {
            block_bitmap: LittleEndian::read_u32(&buf[0..]),
            inode_bitmap: LittleEndian::read_u32(&buf[4..]),
            inode_table: LittleEndian::read_u32(&buf[8..]),
            free_blocks_count: LittleEndian::read_u16(&buf[12..]),
            free_inodes_count: LittleEndian::read_u16(&buf[14..]),
            used_dirs_count: LittleEndian::read_u16(&buf[16..]),
        })
    }
}

/// Inode 结构
///
/// 对应C定义: struct ext2_inode
#[derive(Debug, Clone, Copy, Default)]
pub struct ext2_inode {
    pub mode: u16,                   // 0: 文件模式
    pub uid: u16,                    // 2: 所有者 uid（低16位）
    pub size: u32,                   // 4: 文件大小（低32位）
    pub atime: u32,                  // 8: 访问时间
    pub ctime: u32,                  // 12: 创建时间
    pub mtime: u32,                  // 16: 修改时间
    pub dtime: u32,                  // 20: 删除时间
    pub gid: u16,                    // 24: 组 gid（低16位）
    pub links_count: u16,            // 26: 硬链接数
    pub blocks: u32,                 // 28: 512 字节扇区数
    pub flags: u32,                  // 32: 标志
    pub block: [u32; EXT2_INODE_BLOCKS], // 40: 块指针数组
    pub generation: u32,             // 100: 文件版本
    pub file_acl: u32,               // 104: 文件 ACL
    pub size_high: u32,              // 108: 普通文件大小高32位（目录为 dir_acl）
    pub uid_high: u16,               // 120: uid 高16位
    pub gid_high: u16,               // 122: gid 高16位
}

impl ext2_inode {
    /// 从原始字节解码（至少 128 字节）
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        ensure_len(buf, EXT2_GOOD_OLD_INODE_SIZE as usize, "inode buffer too short")?;

        let mut block = [0u32; EXT2_INODE_BLOCKS];
        LittleEndian::read_u32_into(&buf[40..40 + EXT2_INODE_BLOCKS * 4], &mut block);

        Ok(Self {
            mode: LittleEndian::read_u16(&buf[0..]),
            uid: LittleEndian::read_u16(&buf[2..]),
            size: LittleEndian::read_u32(&buf[4..]),
            atime: LittleEndian::read_u32(&buf[8..]),
            ctime: LittleEndian::read_u32(&buf[12..]),
            mtime: LittleEndian::read_u32(&buf[16..]),
            dtime: LittleEndian::read_u32(&buf[20..]),
            gid: LittleEndian::read_u16(&buf[24..]),
            links_count: LittleEndian::read_u16(&buf[26..]),
            blocks: LittleEndian::read_u32(&buf[28..]),
            flags: LittleEndian::read_u32(&buf[32..]),
            block,
            generation: LittleEndian::read_u32(&buf[100..]),
            file_acl: LittleEndian::read_u32(&buf[104..]),
            size_high: LittleEndian::read_u32(&buf[108..]),
            uid_high: LittleEndian::read_u16(&buf[120..]),
            gid_high: LittleEndian::read_u16(&buf[122..]),
        })
    }

    pub fn is_dir(&self) -> bool {
        self.mode & EXT2_INODE_MODE_TYPE_MASK == EXT2_INODE_MODE_DIRECTORY
    }

    pub fn is_file(&self) -> bool {
        self.mode & EXT2_INODE_MODE_TYPE_MASK == EXT2_INODE_MODE_FILE
    }

    pub fn is_symlink(&self) -> bool {
        self.mode & EXT2_INODE_MODE_TYPE_MASK == EXT2_INODE_MODE_SOFTLINK
    }

    /// 文件大小
    ///
    /// 只有普通文件的 size_high 表示大小高位，目录里同一字段是 dir_acl。
    pub fn file_size(&self) -> u64 {
        if self.is_file() {
            ((self.size_high as u64) << 32) | self.size as u64
        } else {
            self.size as u64
        }
    }
}

bitflags! {
    /// 不兼容特性
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IncompatFeatures: u32 {
        const COMPRESSION = 0x0001;
        const FILETYPE = 0x0002;
        const RECOVER = 0x0004;
        const JOURNAL_DEV = 0x0008;
        const META_BG = 0x0010;
        const EXTENTS = 0x0040;
        const BIT64 = 0x0080;
        const MMP = 0x0100;
        const FLEX_BG = 0x0200;
        const INLINE_DATA = 0x8000;
    }
}

impl IncompatFeatures {
    /// 只读引擎能正确解释的不兼容特性
    pub fn supported() -> Self {
        IncompatFeatures::FILETYPE
    }
}

bitflags! {
    /// 只读兼容特性
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RoCompatFeatures: u32 {
        const SPARSE_SUPER = 0x0001;
        const LARGE_FILE = 0x0002;
        const BTREE_DIR = 0x0004;
    }
}

bitflags! {
    /// inode 模式中的权限位（低 12 位）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InodeMode: u16 {
        const SET_UID = 0o4000;
        const SET_GID = 0o2000;
        const STICKY = 0o1000;
        const USER_READ = 0o0400;
        const USER_WRITE = 0o0200;
        const USER_EXEC = 0o0100;
        const GROUP_READ = 0o0040;
        const GROUP_WRITE = 0o0020;
        const GROUP_EXEC = 0o0010;
        const OTHER_READ = 0o0004;
        const OTHER_WRITE = 0o0002;
        const OTHER_EXEC = 0o0001;

        const ALL_WRITE = Self::USER_WRITE.bits() | Self::GROUP_WRITE.bits() | Self::OTHER_WRITE.bits();
    }
}
