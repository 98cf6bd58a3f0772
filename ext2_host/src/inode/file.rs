//! 文件内容：整文件导出、区间读取和打开检查。

use std::io::Write;

use ext2_core::{BlockDevice, Error, ErrorKind, Ext2FileSystem, WriteSink};

use super::Target;
use crate::error::Result;

/// `open(2)` 访问模式掩码
const O_ACCMODE: i32 = 0o3;
const O_RDONLY: i32 = 0;

/// 把目标文件写入 `dest`，遍历模式取挂载选项
pub(crate) fn dump_target<D: BlockDevice, W: Write>(
    fs: &Ext2FileSystem<D>,
    target: Target<'_>,
    dest: W,
) -> Result<u64> {
    let ino = target.resolve(fs)?;
    let mut sink = WriteSink(dest);
    let written = fs.dump_file(ino, &mut sink, fs.config().walk_mode)?;
    sink.into_inner().flush()?;
    debug!("dumped inode {ino}: {written} bytes");
    Ok(written)
}

/// 按路径读取字节区间
pub(crate) fn read_window<D: BlockDevice>(
    fs: &Ext2FileSystem<D>,
    path: &str,
    offset: u64,
    buf: &mut [u8],
) -> Result<usize> {
    fs.read_file(path, offset, buf)
}

/// 检查以 `flags` 打开 `path` 是否允许
///
/// 目录先于访问模式检查，所以以写方式打开目录得到 `IsADirectory`。
pub(crate) fn check_access<D: BlockDevice>(
    fs: &Ext2FileSystem<D>,
    path: &str,
    flags: i32,
) -> Result<()> {
    let md = fs.metadata(path)?;
    if md.is_dir() {
        return Err(Error::new(ErrorKind::IsADirectory, "cannot open a directory"));
    }
    if flags & O_ACCMODE != O_RDONLY {
        return Err(Error::new(ErrorKind::ReadOnly, "read-only filesystem"));
    }
    Ok(())
}
