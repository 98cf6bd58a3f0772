//! 块映射遍历
//!
//! 把 inode 的直接块、一级间接块和二级间接块展开成逻辑块序列。
//! 三级间接块不做遍历。

mod walker;

pub use walker::BlockMap;

/// 零指针的解释方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkMode {
    /// 第一个零指针即为列表结尾（目录遍历、旧式整文件导出）
    Dense,
    /// 文件末尾之前的零指针表示空洞
    #[default]
    Sparse,
}

/// 单个逻辑块的映射结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSlot {
    /// 物理块号
    Mapped(u64),
    /// 空洞，内容全为零，不占用磁盘块
    Hole,
}

impl BlockSlot {
    pub fn is_hole(&self) -> bool {
        matches!(self, BlockSlot::Hole)
    }

    /// 物理块号，空洞返回 None
    pub fn physical(&self) -> Option<u64> {
        match self {
            BlockSlot::Mapped(b) => Some(*b),
            BlockSlot::Hole => None,
        }
    }
}
