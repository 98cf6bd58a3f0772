//! 宿主调用约定：成功返回 `0` 或非负计数，失败返回负 errno。
//!
//! 前端的全部写入口（write、mkdir、unlink 等）都应直接返回 [`deny_write`]。

use std::io::Write;

use ext2_core::{BlockDevice, Ext2FileSystem, EROFS};

use crate::error::{Context, IntoErrno};
use crate::inode::{self, FileAttr, Target};

/// 导出整个文件到 `dest`
///
/// `target` 可以是 inode 编号或绝对路径，遍历模式取挂载时的 `FsConfig::walk_mode`。
pub fn dump_file<'a, D, W>(fs: &Ext2FileSystem<D>, target: impl Into<Target<'a>>, dest: W) -> i32
where
    D: BlockDevice,
    W: Write,
{
    inode::dump_target(fs, target.into(), dest)
        .map(|_| ())
        .context("dump_file")
        .into_errno() as i32
}

/// 列出目录，结果追加到 `out`
pub fn dump_dir<D: BlockDevice>(
    fs: &Ext2FileSystem<D>,
    ino: u32,
    out: &mut Vec<(u32, char, String)>,
) -> i32 {
    inode::list_entries(fs, ino)
        .map(|entries| out.extend(entries))
        .context("dump_dir")
        .into_errno() as i32
}

/// 从 `path` 的 `offset` 处读取，返回读到的字节数
pub fn read_file<D: BlockDevice>(
    fs: &Ext2FileSystem<D>,
    path: &str,
    offset: u64,
    buf: &mut [u8],
) -> isize {
    inode::read_window(fs, path, offset, buf)
        .context("read_file")
        .into_errno() as isize
}

/// 解析绝对路径，返回 inode 编号
pub fn resolve_path<D: BlockDevice>(fs: &Ext2FileSystem<D>, path: &str) -> i64 {
    fs.resolve_path(path).context("resolve_path").into_errno()
}

/// 读取 inode 属性
pub fn stat<D: BlockDevice>(fs: &Ext2FileSystem<D>, ino: u32, attr: &mut FileAttr) -> i32 {
    inode::get_attr(fs, ino)
        .map(|a| *attr = a)
        .context("stat")
        .into_errno() as i32
}

/// 打开检查：目录返回 `-EISDIR`，写访问返回 `-EROFS`
pub fn check_open<D: BlockDevice>(fs: &Ext2FileSystem<D>, path: &str, flags: i32) -> i32 {
    inode::check_access(fs, path, flags)
        .context("check_open")
        .into_errno() as i32
}

/// 任何修改操作的统一回复
pub fn deny_write(op: &str) -> i32 {
    debug!("rejected {op} on read-only filesystem");
    -EROFS
}
