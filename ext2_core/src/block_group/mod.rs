//! 块组描述符与 inode 定位
//!
//! 描述符按需读取，不做缓存。

mod locate;
mod read;

pub use locate::*;
pub use read::*;
