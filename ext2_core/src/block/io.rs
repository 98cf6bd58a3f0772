//! 块 I/O 操作实现

use byteorder::{ByteOrder, LittleEndian};
use log::trace;

use super::{BlockDev, BlockDevice};
use crate::{
    consts::*,
    error::{Error, ErrorKind, Result},
};

impl<D: BlockDevice> BlockDev<D> {
    /// 读取字节
    ///
    /// 从任意字节偏移读取，要求读满整个缓冲区。
    /// 读取长度不足视为镜像损坏，直接返回 `Io` 错误，不做重试。
    ///
    /// # 示例
    ///
    /// ```rust,ignore
    /// let mut buf = vec![0u8; 100];
    /// block_dev.read_bytes(1024, &mut buf)?;
    /// ```
    pub fn read_bytes(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }

        let n = self.raw_read(offset, buf)?;
        self.record_read(n);

        if n < buf.len() {
            trace!("short read at {offset:#x}: {n} of {} bytes", buf.len());
            return Err(Error::io(EIO, "short read from image"));
        }

        Ok(())
    }

    /// 读取单个逻辑块
    ///
    /// 块大小由缓冲区长度决定（即 superblock 中的块大小）。
    ///
    /// # 参数
    ///
    /// * `lba` - 块号
    /// * `buf` - 目标缓冲区，长度等于块大小
    pub fn read_block(&self, lba: u64, buf: &mut [u8]) -> Result<()> {
        let offset = block_offset(lba, buf.len() as u32)?;
        self.read_bytes(offset, buf)
    }
}

/// 计算块号对应的字节偏移，溢出视为损坏的块号
pub fn block_offset(lba: u64, block_size: u32) -> Result<u64> {
    lba.checked_mul(block_size as u64)
        .ok_or(Error::new(ErrorKind::Corrupted, "block number overflows image offset"))
}

/// 读取指针块中第 `index` 个块号
pub fn pointer_at(block: &[u8], index: usize) -> u32 {
    let start = index * EXT2_BLOCK_POINTER_SIZE;
    LittleEndian::read_u32(&block[start..start + EXT2_BLOCK_POINTER_SIZE])
}
