//! 镜像设备抽象
//!
//! 提供随机访问镜像接口和块级只读 I/O 操作。

mod device;
#[cfg(all(feature = "std", unix))]
mod file;
mod io;
mod mem;

pub use device::{BlockDev, BlockDevice};
#[cfg(all(feature = "std", unix))]
pub use file::FileDevice;
pub use mem::MemDevice;

pub(crate) use io::{block_offset, pointer_at};
