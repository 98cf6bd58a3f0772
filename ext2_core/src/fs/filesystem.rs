//! ext2 文件系统会话

use alloc::vec::Vec;
use log::{debug, warn};

use crate::{
    block::{BlockDev, BlockDevice},
    block_group::locate_inode,
    block_map::WalkMode,
    dir::{lookup_in_dir, lookup_path, DirEntry, DirReader},
    error::{Error, ErrorKind, Result},
    inode::Inode,
    superblock::Superblock,
};

use super::{
    file::{dump_full, read_range, File, Sink},
    metadata::{FileMetadata, StatFs},
};

/// 挂载选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsConfig {
    /// 整文件导出的默认零指针解释
    pub walk_mode: WalkMode,
    /// 校验 superblock 魔数
    pub verify_magic: bool,
    /// 拒绝带有未知不兼容特性的镜像
    pub strict_feature_check: bool,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            walk_mode: WalkMode::Sparse,
            verify_magic: true,
            strict_feature_check: true,
        }
    }
}

/// ext2 文件系统
///
/// 只读会话：持有镜像和挂载时解码的 superblock，其余结构每次请求时
/// 从镜像重新解码。所有操作只需要 `&self`，可以在线程间共享。
///
/// # 示例
///
/// ```rust,ignore
/// use ext2_core::{BlockDev, Ext2FileSystem, MemDevice};
///
/// let bdev = BlockDev::new(MemDevice::new(image));
/// let fs = Ext2FileSystem::mount(bdev)?;
///
/// let ino = fs.resolve_path("/subdir/hello.txt")?;
/// let mut buf = vec![0u8; 1024];
/// let n = fs.read_at(ino, 0, &mut buf)?;
///
/// for entry in fs.read_dir(2)? {
///     let entry = entry?;
///     println!("{} {}", entry.type_char(), entry.name_lossy());
/// }
/// ```
pub struct Ext2FileSystem<D: BlockDevice> {
    bdev: BlockDev<D>,
    sb: Superblock,
    config: FsConfig,
}

impl<D: BlockDevice> Ext2FileSystem<D> {
    /// 以默认选项挂载
    ///
    /// # 错误
    ///
    /// - `ErrorKind::Corrupted` - 无效的 superblock
    /// - `ErrorKind::Unsupported` - 镜像使用了无法解释的特性
    /// - `ErrorKind::Io` - 设备读取失败
    pub fn mount(bdev: BlockDev<D>) -> Result<Self> {
        Self::mount_with_config(bdev, FsConfig::default())
    }

    /// 以指定选项挂载
    pub fn mount_with_config(bdev: BlockDev<D>, config: FsConfig) -> Result<Self> {
        let sb = Superblock::load(&bdev, config.verify_magic)?;

        let unsupported = sb.unsupported_incompat();
        if !unsupported.is_empty() {
            if config.strict_feature_check {
                warn!("refusing image with incompat features {:#x}", unsupported.bits());
                return Err(Error::new(
                    ErrorKind::Unsupported,
                    "image uses unsupported incompatible features",
                ));
            }
            warn!("ignoring incompat features {:#x}", unsupported.bits());
        }

        debug!(
            "mounted ext2: {} blocks of {} bytes, {} inodes, {} groups, volume {:?}",
            sb.blocks_count(),
            sb.block_size(),
            sb.inodes_count(),
            sb.block_group_count(),
            sb.volume_name().unwrap_or("")
        );

        Ok(Self { bdev, sb, config })
    }

    /// 获取 superblock 引用
    pub fn superblock(&self) -> &Superblock {
        &self.sb
    }

    /// 获取块设备引用
    pub fn block_device(&self) -> &BlockDev<D> {
        &self.bdev
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// 结束会话并取回设备
    pub fn unmount(self) -> BlockDev<D> {
        self.bdev
    }

    /// 加载 inode
    pub fn inode(&self, inode_num: u32) -> Result<Inode> {
        Inode::load(&self.bdev, &self.sb, inode_num)
    }

    /// inode 记录在镜像中的字节偏移
    pub fn locate_inode(&self, inode_num: u32) -> Result<u64> {
        locate_inode(&self.bdev, &self.sb, inode_num)
    }

    /// 把绝对路径解析为 inode 编号
    pub fn resolve_path(&self, path: &str) -> Result<u32> {
        lookup_path(&self.bdev, &self.sb, path)
    }

    /// 在目录 `dir` 中查找 `name`
    pub fn lookup(&self, dir: u32, name: &[u8]) -> Result<u32> {
        let inode = self.inode(dir)?;
        lookup_in_dir(&self.bdev, &self.sb, &inode, name)
    }

    /// 获取 inode 的元数据
    pub fn stat(&self, inode_num: u32) -> Result<FileMetadata> {
        let inode = self.inode(inode_num)?;
        Ok(FileMetadata::from_inode(&inode, self.sb.block_size()))
    }

    /// 获取路径的元数据
    ///
    /// # 示例
    ///
    /// ```rust,ignore
    /// let metadata = fs.metadata("/etc/passwd")?;
    /// println!("Size: {} bytes", metadata.size);
    /// println!("UID: {}, GID: {}", metadata.uid, metadata.gid);
    /// ```
    pub fn metadata(&self, path: &str) -> Result<FileMetadata> {
        self.stat(self.resolve_path(path)?)
    }

    /// 文件系统统计
    pub fn statfs(&self) -> StatFs {
        StatFs::from_superblock(&self.sb)
    }

    /// 惰性读取目录
    pub fn read_dir(&self, inode_num: u32) -> Result<DirReader<'_, D>> {
        let inode = self.inode(inode_num)?;
        DirReader::new(&self.bdev, &self.sb, &inode)
    }

    /// 读取目录的全部目录项
    pub fn list_dir(&self, inode_num: u32) -> Result<Vec<DirEntry>> {
        self.read_dir(inode_num)?.collect()
    }

    /// 导出整个文件
    ///
    /// # 返回
    ///
    /// 写入 `sink` 的字节数
    pub fn dump_file<S: Sink + ?Sized>(
        &self,
        inode_num: u32,
        sink: &mut S,
        mode: WalkMode,
    ) -> Result<u64> {
        let inode = self.inode(inode_num)?;
        dump_full(&self.bdev, &self.sb, &inode, sink, mode)
    }

    /// 按路径导出整个文件
    pub fn dump_path<S: Sink + ?Sized>(
        &self,
        path: &str,
        sink: &mut S,
        mode: WalkMode,
    ) -> Result<u64> {
        self.dump_file(self.resolve_path(path)?, sink, mode)
    }

    /// 从 inode 的 `offset` 处读取
    pub fn read_at(&self, inode_num: u32, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let inode = self.inode(inode_num)?;
        if inode.is_dir() {
            return Err(Error::new(ErrorKind::IsADirectory, "cannot read a directory"));
        }
        read_range(&self.bdev, &self.sb, &inode, offset, buf)
    }

    /// 按路径读取字节区间
    ///
    /// # 示例
    ///
    /// ```rust,ignore
    /// let mut buf = [0u8; 4096];
    /// let n = fs.read_file("/hello.txt", 0, &mut buf)?;
    /// ```
    pub fn read_file(&self, path: &str, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.read_at(self.resolve_path(path)?, offset, buf)
    }

    /// 打开文件
    ///
    /// # 错误
    ///
    /// - `ErrorKind::IsADirectory` - 路径指向目录
    pub fn open(&self, path: &str) -> Result<File<D>> {
        let inode = self.inode(self.resolve_path(path)?)?;

        if inode.is_dir() {
            return Err(Error::new(ErrorKind::IsADirectory, "cannot open a directory"));
        }

        Ok(File::new(inode))
    }

    /// 检查路径是否存在
    pub fn exists(&self, path: &str) -> bool {
        self.resolve_path(path).is_ok()
    }

    /// 检查路径是否是目录
    pub fn is_dir(&self, path: &str) -> Result<bool> {
        Ok(self.metadata(path)?.is_dir())
    }

    /// 检查路径是否是普通文件
    pub fn is_file(&self, path: &str) -> Result<bool> {
        Ok(self.metadata(path)?.is_file())
    }
}
