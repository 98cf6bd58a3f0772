//! 文件内容提取

use alloc::vec;
use alloc::vec::Vec;
use log::trace;

use crate::{
    block::{block_offset, BlockDev, BlockDevice},
    block_map::{BlockMap, BlockSlot, WalkMode},
    error::{Error, ErrorKind, Result},
    inode::Inode,
    superblock::Superblock,
};

use super::filesystem::Ext2FileSystem;

/// 整文件导出的输出端
pub trait Sink {
    /// 写入全部字节
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// 写入 `len` 个零字节（空洞）
    fn write_zeros(&mut self, len: usize) -> Result<()> {
        const ZEROS: [u8; 512] = [0u8; 512];
        let mut left = len;
        while left > 0 {
            let n = left.min(ZEROS.len());
            self.write_all(&ZEROS[..n])?;
            left -= n;
        }
        Ok(())
    }
}

impl Sink for Vec<u8> {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }

    fn write_zeros(&mut self, len: usize) -> Result<()> {
        self.resize(self.len() + len, 0);
        Ok(())
    }
}

/// 把任意 `std::io::Write` 作为输出端
#[cfg(feature = "std")]
pub struct WriteSink<W: std::io::Write>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> WriteSink<W> {
    pub fn into_inner(self) -> W {
        self.0
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> Sink for WriteSink<W> {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        std::io::Write::write_all(&mut self.0, data)?;
        Ok(())
    }
}

/// 导出整个文件
///
/// 按块映射顺序写出 `size` 字节，空洞写零，最后一块截断到文件末尾。
/// `Dense` 模式在第一个零指针处停止，写出的字节可能少于 `size`。
///
/// # 返回
///
/// 写出的字节数
pub fn dump_full<D: BlockDevice, S: Sink + ?Sized>(
    bdev: &BlockDev<D>,
    sb: &Superblock,
    inode: &Inode,
    sink: &mut S,
    mode: WalkMode,
) -> Result<u64> {
    let bs = sb.block_size() as u64;
    let size = inode.file_size();
    let mut buf = vec![0u8; bs as usize];
    let mut written = 0u64;

    for entry in BlockMap::new(bdev, sb, inode, mode)? {
        let (index, slot) = entry?;
        let len = (size - index * bs).min(bs) as usize;

        match slot {
            BlockSlot::Mapped(block) => {
                bdev.read_bytes(block_offset(block, bs as u32)?, &mut buf[..len])?;
                sink.write_all(&buf[..len])?;
            }
            BlockSlot::Hole => sink.write_zeros(len)?,
        }

        written += len as u64;
    }

    trace!("inode {}: dumped {written} of {size} bytes", inode.inode_num());

    Ok(written)
}

/// 读取字节区间
///
/// 把 `[offset, offset + buf.len()) ∩ [0, size)` 复制到 `buf` 开头。
/// 与区间不相交的块不读取，区间内的空洞直接填零。
///
/// # 返回
///
/// 写入 `buf` 的字节数；`offset >= size` 时为 0
pub fn read_range<D: BlockDevice>(
    bdev: &BlockDev<D>,
    sb: &Superblock,
    inode: &Inode,
    offset: u64,
    buf: &mut [u8],
) -> Result<usize> {
    let size = inode.file_size();
    if offset >= size || buf.is_empty() {
        return Ok(0);
    }

    let end = offset.saturating_add(buf.len() as u64).min(size);
    let bs = sb.block_size() as u64;
    let mut map = BlockMap::new(bdev, sb, inode, WalkMode::Sparse)?;

    for index in offset / bs..=(end - 1) / bs {
        let block_start = index * bs;
        let from = offset.max(block_start);
        let to = end.min(block_start + bs);
        let dst = &mut buf[(from - offset) as usize..(to - offset) as usize];

        match map.map_logical_block(index)? {
            Some(BlockSlot::Mapped(block)) => {
                let pos = block_offset(block, bs as u32)? + (from - block_start);
                bdev.read_bytes(pos, dst)?;
            }
            Some(BlockSlot::Hole) | None => dst.fill(0),
        }
    }

    Ok((end - offset) as usize)
}

/// 文件句柄
///
/// 表示一个打开的文件，支持读取和定位操作
pub struct File<D: BlockDevice> {
    inode: Inode,
    offset: u64,
    _phantom: core::marker::PhantomData<D>,
}

impl<D: BlockDevice> File<D> {
    /// 创建新的文件句柄（内部使用）
    pub(super) fn new(inode: Inode) -> Self {
        Self {
            inode,
            offset: 0,
            _phantom: core::marker::PhantomData,
        }
    }

    /// 读取文件内容
    ///
    /// 从当前位置读取数据到缓冲区，并更新文件位置
    ///
    /// # 返回
    ///
    /// 实际读取的字节数（可能小于缓冲区大小）
    ///
    /// # 示例
    ///
    /// ```rust,ignore
    /// let mut file = fs.open("/etc/passwd")?;
    /// let mut buf = vec![0u8; 1024];
    /// let n = file.read(&fs, &mut buf)?;
    /// ```
    pub fn read(&mut self, fs: &Ext2FileSystem<D>, buf: &mut [u8]) -> Result<usize> {
        let n = self.read_at(fs, self.offset, buf)?;
        self.offset += n as u64;
        Ok(n)
    }

    /// 定位读取，不改变文件位置
    pub fn read_at(&self, fs: &Ext2FileSystem<D>, offset: u64, buf: &mut [u8]) -> Result<usize> {
        read_range(fs.block_device(), fs.superblock(), &self.inode, offset, buf)
    }

    /// 读取剩余的全部内容
    pub fn read_to_end(&mut self, fs: &Ext2FileSystem<D>) -> Result<Vec<u8>> {
        let remaining = self.inode.file_size().saturating_sub(self.offset);

        if remaining > usize::MAX as u64 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "File too large to read into memory",
            ));
        }

        let mut buf = vec![0u8; remaining as usize];
        let n = self.read(fs, &mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// 移动文件指针
    ///
    /// # 错误
    ///
    /// 如果位置超出文件大小，返回 `InvalidInput`
    pub fn seek(&mut self, pos: u64) -> Result<u64> {
        if pos > self.inode.file_size() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Seek position beyond file size",
            ));
        }

        self.offset = pos;
        Ok(self.offset)
    }

    /// 获取当前文件指针位置
    pub fn position(&self) -> u64 {
        self.offset
    }

    /// 获取文件大小
    pub fn size(&self) -> u64 {
        self.inode.file_size()
    }

    /// 获取 inode 编号
    pub fn inode_num(&self) -> u32 {
        self.inode.inode_num()
    }

    /// 重置文件指针到起始位置
    pub fn rewind(&mut self) {
        self.offset = 0;
    }
}
