//! 目录列举：产出宿主需要的 `(inode, 类型字符, 名称)` 三元组。

use ext2_core::{BlockDevice, DirEntry, Ext2FileSystem, FileType};

use crate::error::Result;

/// 列出目录的全部目录项
///
/// 目录项里没有类型信息（不带 filetype 特性的镜像）时读取 inode 补全。
pub(crate) fn list_entries<D: BlockDevice>(
    fs: &Ext2FileSystem<D>,
    ino: u32,
) -> Result<Vec<(u32, char, String)>> {
    let mut out = Vec::new();
    for entry in fs.read_dir(ino)? {
        let entry = entry?;
        let kind = type_char(fs, &entry)?;
        out.push((entry.inode, kind, entry.name_lossy().into_owned()));
    }
    trace!("listed {} entries of inode {ino}", out.len());
    Ok(out)
}

fn type_char<D: BlockDevice>(fs: &Ext2FileSystem<D>, entry: &DirEntry) -> Result<char> {
    if entry.file_type != FileType::Unknown {
        return Ok(entry.type_char());
    }
    let md = fs.stat(entry.inode)?;
    Ok(FileType::from(md.file_type).type_char())
}
