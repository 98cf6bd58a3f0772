//! 块映射遍历器

use alloc::{vec, vec::Vec};
use log::trace;

use super::{BlockSlot, WalkMode};
use crate::{
    block::{pointer_at, BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    inode::Inode,
    superblock::Superblock,
};

/// 遍历栈中的一层：缓存最近读入的指针块
struct Frame {
    block: Option<u32>,
    buf: Vec<u8>,
}

impl Frame {
    fn new(block_size: usize) -> Self {
        Self {
            block: None,
            buf: vec![0u8; block_size],
        }
    }
}

/// 逻辑块到物理块的遍历器
///
/// 按逻辑块顺序产出 `(logical_index, BlockSlot)`，恰好覆盖
/// `ceil(size / block_size)` 个逻辑块。每层间接块只持有一个块大小的缓冲区，
/// 同一个指针块只在切换到它时读取一次，不跨文件缓存。
///
/// # 示例
///
/// ```rust,ignore
/// let map = BlockMap::new(&bdev, &sb, &inode, WalkMode::Sparse)?;
/// for entry in map {
///     let (index, slot) = entry?;
///     // ...
/// }
/// ```
pub struct BlockMap<'a, D: BlockDevice> {
    bdev: &'a BlockDev<D>,
    inode: Inode,
    mode: WalkMode,
    per_block: u64,
    total: u64,
    next: u64,
    /// frames[0]: 一级指针块；frames[1]: 二级指针块
    frames: [Frame; 2],
    finished: bool,
}

impl<'a, D: BlockDevice> BlockMap<'a, D> {
    /// 创建遍历器
    ///
    /// # 错误
    ///
    /// * `Unsupported` - inode 使用 extent 树
    pub fn new(
        bdev: &'a BlockDev<D>,
        sb: &Superblock,
        inode: &Inode,
        mode: WalkMode,
    ) -> Result<Self> {
        if inode.has_extents() {
            return Err(Error::new(
                ErrorKind::Unsupported,
                "extent-mapped inodes are not supported",
            ));
        }

        let block_size = sb.block_size() as u64;
        let total = inode.file_size().div_ceil(block_size);

        Ok(Self {
            bdev,
            inode: inode.clone(),
            mode,
            per_block: sb.pointers_per_block() as u64,
            total,
            next: 0,
            frames: [Frame::new(block_size as usize), Frame::new(block_size as usize)],
            finished: false,
        })
    }

    /// 需要映射的逻辑块总数
    pub fn total_blocks(&self) -> u64 {
        self.total
    }

    pub fn mode(&self) -> WalkMode {
        self.mode
    }

    /// 回到第一个逻辑块
    pub fn rewind(&mut self) {
        self.next = 0;
        self.finished = false;
    }

    /// 映射单个逻辑块
    ///
    /// # 返回
    ///
    /// * `Some(slot)` - 映射结果
    /// * `None` - 超出文件范围，或 `Dense` 模式下遇到零指针
    ///
    /// # 错误
    ///
    /// * `Unsupported` - 逻辑块落在三级间接区域
    /// * `Io` - 指针块读取失败
    pub fn map_logical_block(&mut self, index: u64) -> Result<Option<BlockSlot>> {
        if index >= self.total {
            return Ok(None);
        }

        let direct = EXT2_INODE_DIRECT_BLOCKS as u64;
        let p = self.per_block;

        if index < direct {
            let ptr = self.inode.get_direct_block(index as usize).unwrap_or(0);
            return Ok(self.leaf(ptr));
        }

        let rel = index - direct;
        if rel < p {
            let ind = self.inode.get_indirect_block();
            if ind == 0 {
                return Ok(self.absent());
            }
            let ptr = self.entry(0, ind, rel)?;
            return Ok(self.leaf(ptr));
        }

        let rel = rel - p;
        if rel < p * p {
            let dind = self.inode.get_double_indirect_block();
            if dind == 0 {
                return Ok(self.absent());
            }
            let single = self.entry(1, dind, rel / p)?;
            if single == 0 {
                return Ok(self.absent());
            }
            let ptr = self.entry(0, single, rel % p)?;
            return Ok(self.leaf(ptr));
        }

        Err(Error::new(
            ErrorKind::Unsupported,
            "triple-indirect blocks are not supported",
        ))
    }

    /// 数据块指针的解释
    fn leaf(&self, ptr: u32) -> Option<BlockSlot> {
        if ptr == 0 {
            self.absent()
        } else {
            Some(BlockSlot::Mapped(ptr as u64))
        }
    }

    /// 零指针（数据块或整棵子树缺失）
    fn absent(&self) -> Option<BlockSlot> {
        match self.mode {
            WalkMode::Dense => None,
            WalkMode::Sparse => Some(BlockSlot::Hole),
        }
    }

    /// 读取指针块中的一项，必要时先把该块装入对应的层
    fn entry(&mut self, level: usize, block: u32, index: u64) -> Result<u32> {
        let frame = &mut self.frames[level];
        if frame.block != Some(block) {
            trace!("loading level-{} pointer block {}", level + 1, block);
            frame.block = None;
            self.bdev.read_block(block as u64, &mut frame.buf)?;
            frame.block = Some(block);
        }
        Ok(pointer_at(&frame.buf, index as usize))
    }
}

impl<D: BlockDevice> Iterator for BlockMap<'_, D> {
    type Item = Result<(u64, BlockSlot)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let index = self.next;
        match self.map_logical_block(index) {
            Ok(Some(slot)) => {
                self.next += 1;
                Some(Ok((index, slot)))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
