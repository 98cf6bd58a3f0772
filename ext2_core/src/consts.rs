//! ext2 常量定义

/// Superblock 位置（从镜像开始的字节偏移）
pub const EXT2_SUPERBLOCK_OFFSET: u64 = 1024;

/// Superblock 大小
pub const EXT2_SUPERBLOCK_SIZE: usize = 1024;

/// ext2 魔数
pub const EXT2_SUPERBLOCK_MAGIC: u16 = 0xEF53;

/// 最小 / 最大块大小
pub const EXT2_MIN_BLOCK_SIZE: u32 = 1024;
pub const EXT2_MAX_BLOCK_SIZE: u32 = 65536;

/// 目录项记录长度上限（整个 64 KiB 块）
pub const EXT2_MAX_REC_LEN: u32 = 65536;

/// 版本号
pub const EXT2_GOOD_OLD_REV: u32 = 0;
pub const EXT2_DYNAMIC_REV: u32 = 1;

/// rev 0 下 inode 记录的固定大小，也是本实现解析的字段范围
pub const EXT2_GOOD_OLD_INODE_SIZE: u16 = 128;

/// 块组描述符大小
pub const EXT2_GROUP_DESC_SIZE: usize = 32;

/// 根目录 inode 编号
pub const EXT2_ROOT_INO: u32 = 2;

/// Inode 结构中的块指针数量（12个直接块 + 1个间接块 + 1个二级间接块 + 1个三级间接块）
pub const EXT2_INODE_BLOCKS: usize = 15;

/// 直接块数量
pub const EXT2_INODE_DIRECT_BLOCKS: usize = 12;

/// 间接块指针所在槽位
pub const EXT2_INODE_INDIRECT_BLOCK: usize = 12;
pub const EXT2_INODE_DOUBLE_INDIRECT_BLOCK: usize = 13;
pub const EXT2_INODE_TRIPLE_INDIRECT_BLOCK: usize = 14;

/// 间接块中每个块号的字节数
pub const EXT2_BLOCK_POINTER_SIZE: usize = 4;

/// 目录项固定头部长度（inode + rec_len + name_len + file_type）
pub const EXT2_DIR_ENTRY_HEADER_SIZE: usize = 8;

/// 目录项名称最大长度
pub const EXT2_NAME_LEN: usize = 255;

/// Inode flags: 使用 extent 树（ext4，不支持）
pub const EXT2_INODE_FLAG_EXTENTS: u32 = 0x80000;

/// 目录项类型常量
pub const EXT2_FT_UNKNOWN: u8 = 0;
pub const EXT2_FT_REG_FILE: u8 = 1;
pub const EXT2_FT_DIR: u8 = 2;
pub const EXT2_FT_CHRDEV: u8 = 3;
pub const EXT2_FT_BLKDEV: u8 = 4;
pub const EXT2_FT_FIFO: u8 = 5;
pub const EXT2_FT_SOCK: u8 = 6;
pub const EXT2_FT_SYMLINK: u8 = 7;

/// 错误码（兼容 C errno）
pub const EOK: i32 = 0;
pub const ENOENT: i32 = 2;
pub const EIO: i32 = 5;
pub const ENOTDIR: i32 = 20;
pub const EISDIR: i32 = 21;
pub const EINVAL: i32 = 22;
pub const EROFS: i32 = 30;
pub const EUCLEAN: i32 = 117;

/// Inode 模式位
pub const EXT2_INODE_MODE_FIFO: u16 = 0x1000;
pub const EXT2_INODE_MODE_CHARDEV: u16 = 0x2000;
pub const EXT2_INODE_MODE_DIRECTORY: u16 = 0x4000;
pub const EXT2_INODE_MODE_BLOCKDEV: u16 = 0x6000;
pub const EXT2_INODE_MODE_FILE: u16 = 0x8000;
pub const EXT2_INODE_MODE_SOFTLINK: u16 = 0xA000;
pub const EXT2_INODE_MODE_SOCKET: u16 = 0xC000;
pub const EXT2_INODE_MODE_TYPE_MASK: u16 = 0xF000;
