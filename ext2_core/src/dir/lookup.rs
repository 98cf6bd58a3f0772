//! 路径查找

use log::debug;

use super::DirReader;
use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    inode::Inode,
    superblock::Superblock,
};

/// 在单个目录中按名称查找
///
/// 名称按完整字节精确比较，返回第一个匹配项的 inode 编号。
///
/// # 错误
///
/// * `NotADirectory` - `dir` 不是目录
/// * `NotFound` - 没有匹配的目录项
pub fn lookup_in_dir<D: BlockDevice>(
    bdev: &BlockDev<D>,
    sb: &Superblock,
    dir: &Inode,
    name: &[u8],
) -> Result<u32> {
    for entry in DirReader::new(bdev, sb, dir)? {
        let entry = entry?;
        if entry.name() == name {
            return Ok(entry.inode);
        }
    }

    Err(Error::new(ErrorKind::NotFound, "no such directory entry"))
}

/// 将绝对路径解析为 inode 编号
///
/// 空路径和 `/` 直接返回根目录，不做任何读取。空分量（连续的 `/`）被跳过。
/// 路径以 `/` 结尾时，目标必须是目录。
///
/// # 错误
///
/// * `InvalidInput` - 路径不以 `/` 开头
/// * `NotADirectory` - 中间分量不是目录
/// * `NotFound` - 某个分量不存在
///
/// # 示例
///
/// ```rust,ignore
/// let ino = lookup_path(&bdev, &sb, "/subdir/hello.txt")?;
/// ```
pub fn lookup_path<D: BlockDevice>(
    bdev: &BlockDev<D>,
    sb: &Superblock,
    path: &str,
) -> Result<u32> {
    if path.is_empty() || path == "/" {
        return Ok(EXT2_ROOT_INO);
    }

    if !path.starts_with('/') {
        return Err(Error::new(ErrorKind::InvalidInput, "path must be absolute"));
    }

    let mut current = EXT2_ROOT_INO;

    for component in path.split('/').filter(|c| !c.is_empty()) {
        let dir = Inode::load(bdev, sb, current)?;
        if !dir.is_dir() {
            return Err(Error::new(
                ErrorKind::NotADirectory,
                "path component is not a directory",
            ));
        }

        current = lookup_in_dir(bdev, sb, &dir, component.as_bytes())?;
        debug!("lookup {path}: {component} -> inode {current}");
    }

    if path.ends_with('/') && current != EXT2_ROOT_INO {
        if !Inode::load(bdev, sb, current)?.is_dir() {
            return Err(Error::new(
                ErrorKind::NotADirectory,
                "trailing slash on a non-directory",
            ));
        }
    }

    Ok(current)
}
