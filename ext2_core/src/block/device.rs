//! 镜像设备核心类型

use core::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;

/// 镜像设备接口
///
/// 实现此 trait 以提供底层镜像的定位读取。读取只通过 `&self` 进行，
/// 不依赖任何游标，因此同一个设备可以被多个请求同时使用。
///
/// # 示例
///
/// ```rust,ignore
/// use ext2_core::{BlockDevice, Result};
///
/// struct MyDevice {
///     // ...
/// }
///
/// impl BlockDevice for MyDevice {
///     fn total_size(&self) -> u64 {
///         64 * 1024 * 1024
///     }
///
///     fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
///         // 实现定位读取
///         Ok(buf.len())
///     }
/// }
/// ```
pub trait BlockDevice {
    /// 镜像总字节数
    fn total_size(&self) -> u64;

    /// 从 `offset` 处读取最多 `buf.len()` 字节
    ///
    /// # 返回
    ///
    /// 实际读取的字节数；少于请求长度表示到达镜像末尾
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;
}

/// 镜像设备包装器
///
/// 为 ext2 引擎提供块级只读访问，包含读取统计。
/// 统计使用原子计数器，是会话里唯一的共享可变状态。
pub struct BlockDev<D> {
    /// 底层设备
    device: D,
    /// 读取次数
    read_count: AtomicU64,
    /// 读取字节数
    bytes_read: AtomicU64,
}

impl<D: BlockDevice> BlockDev<D> {
    /// 创建新的设备包装器
    pub fn new(device: D) -> Self {
        Self {
            device,
            read_count: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
        }
    }

    /// 获取底层设备的引用
    pub fn device(&self) -> &D {
        &self.device
    }

    /// 取回底层设备
    pub fn into_inner(self) -> D {
        self.device
    }

    /// 镜像总字节数
    pub fn total_size(&self) -> u64 {
        self.device.total_size()
    }

    /// 获取读取次数
    pub fn read_count(&self) -> u64 {
        self.read_count.load(Ordering::Relaxed)
    }

    /// 获取读取字节数
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read.load(Ordering::Relaxed)
    }

    /// 清零统计
    pub fn reset_stats(&self) {
        self.read_count.store(0, Ordering::Relaxed);
        self.bytes_read.store(0, Ordering::Relaxed);
    }

    // 内部辅助方法

    pub(super) fn record_read(&self, len: usize) {
        self.read_count.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(len as u64, Ordering::Relaxed);
    }

    pub(super) fn raw_read(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.device.read_at(offset, buf)
    }
}
