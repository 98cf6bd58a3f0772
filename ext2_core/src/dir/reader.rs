//! 目录遍历

use alloc::{vec, vec::Vec};
use log::trace;

use super::{parse_entry, DirEntry};
use crate::{
    block::{BlockDev, BlockDevice},
    block_map::{BlockMap, BlockSlot, WalkMode},
    error::{Error, ErrorKind, Result},
    inode::Inode,
    superblock::Superblock,
};

/// 惰性目录读取器
///
/// 按块映射顺序逐块读取目录数据，每次产出一个目录项。块映射以
/// `Dense` 模式遍历，第一个零指针结束目录。块内遇到 inode 为 0 的
/// 目录项时跳到下一块。可通过 `rewind` 重新开始。
///
/// # 示例
///
/// ```rust,ignore
/// let reader = fs.read_dir(2)?;
/// for entry in reader {
///     let entry = entry?;
///     println!("{} {}", entry.type_char(), entry.name_lossy());
/// }
/// ```
pub struct DirReader<'a, D: BlockDevice> {
    bdev: &'a BlockDev<D>,
    map: BlockMap<'a, D>,
    buf: Vec<u8>,
    pos: usize,
    loaded: bool,
    has_filetype: bool,
    done: bool,
}

impl<'a, D: BlockDevice> DirReader<'a, D> {
    /// 为目录 inode 创建读取器
    ///
    /// # 错误
    ///
    /// * `NotADirectory` - inode 不是目录
    pub fn new(bdev: &'a BlockDev<D>, sb: &Superblock, inode: &Inode) -> Result<Self> {
        if !inode.is_dir() {
            return Err(Error::new(ErrorKind::NotADirectory, "inode is not a directory"));
        }

        let map = BlockMap::new(bdev, sb, inode, WalkMode::Dense)?;

        Ok(Self {
            bdev,
            map,
            buf: vec![0u8; sb.block_size() as usize],
            pos: 0,
            loaded: false,
            has_filetype: sb.has_filetype(),
            done: false,
        })
    }

    /// 从第一个目录项重新开始
    pub fn rewind(&mut self) {
        self.map.rewind();
        self.pos = 0;
        self.loaded = false;
        self.done = false;
    }

    fn fail(&mut self, e: Error) -> Option<Result<DirEntry>> {
        self.done = true;
        Some(Err(e))
    }
}

impl<D: BlockDevice> Iterator for DirReader<'_, D> {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if self.loaded {
                match parse_entry(&self.buf, self.pos, self.has_filetype) {
                    Ok(Some((entry, next))) => {
                        self.pos = next;
                        return Some(Ok(entry));
                    }
                    Ok(None) => self.loaded = false,
                    Err(e) => return self.fail(e),
                }
            }

            match self.map.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => return self.fail(e),
                Some(Ok((index, BlockSlot::Mapped(block)))) => {
                    trace!("directory block {index} -> {block}");
                    if let Err(e) = self.bdev.read_block(block, &mut self.buf) {
                        return self.fail(e);
                    }
                    self.pos = 0;
                    self.loaded = true;
                }
                // Dense 遍历不会产出空洞
                Some(Ok((_, BlockSlot::Hole))) => continue,
            }
        }
    }
}
