//! 目录项解析

use alloc::{borrow::Cow, string::String, vec::Vec};
use byteorder::{ByteOrder, LittleEndian};

use crate::{
    consts::*,
    error::{Error, ErrorKind, Result},
    inode::InodeType,
};

/// 目录项中记录的文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Unknown,
    RegularFile,
    Directory,
    CharacterDevice,
    BlockDevice,
    Fifo,
    Socket,
    Symlink,
}

impl FileType {
    /// 从目录项的 file_type 字节解码
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            EXT2_FT_REG_FILE => FileType::RegularFile,
            EXT2_FT_DIR => FileType::Directory,
            EXT2_FT_CHRDEV => FileType::CharacterDevice,
            EXT2_FT_BLKDEV => FileType::BlockDevice,
            EXT2_FT_FIFO => FileType::Fifo,
            EXT2_FT_SOCK => FileType::Socket,
            EXT2_FT_SYMLINK => FileType::Symlink,
            _ => FileType::Unknown,
        }
    }

    /// 目录列表使用的单字符类型标记
    pub fn type_char(&self) -> char {
        match self {
            FileType::RegularFile => 'f',
            FileType::Directory => 'd',
            _ => '?',
        }
    }
}

impl From<InodeType> for FileType {
    fn from(t: InodeType) -> Self {
        match t {
            InodeType::RegularFile => FileType::RegularFile,
            InodeType::Directory => FileType::Directory,
            InodeType::CharacterDevice => FileType::CharacterDevice,
            InodeType::BlockDevice => FileType::BlockDevice,
            InodeType::Fifo => FileType::Fifo,
            InodeType::Socket => FileType::Socket,
            InodeType::Symlink => FileType::Symlink,
            InodeType::Unknown => FileType::Unknown,
        }
    }
}

/// 目录项
///
/// 名称按磁盘上的 name_len 截取，不以 NUL 结尾。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// inode 编号
    pub inode: u32,
    /// 记录长度（已解码，64 KiB 块中可达 65536）
    pub rec_len: u32,
    /// 文件类型（无 FILETYPE 特性时为 Unknown）
    pub file_type: FileType,
    name: Vec<u8>,
}

impl DirEntry {
    pub fn new(inode: u32, file_type: FileType, name: &[u8]) -> Self {
        Self {
            inode,
            rec_len: (EXT2_DIR_ENTRY_HEADER_SIZE + name.len()) as u32,
            file_type,
            name: name.to_vec(),
        }
    }

    /// 原始名称字节
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// 名称（非 UTF-8 字节替换为 U+FFFD）
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    pub fn type_char(&self) -> char {
        self.file_type.type_char()
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

/// 解码磁盘上的 rec_len
///
/// 16 位字段放不下 65536，占满整个 64 KiB 块的记录写成 `0xFFFF`（或 0）。
pub fn rec_len_from_disk(raw: u16, block_size: usize) -> u32 {
    if block_size < EXT2_MAX_REC_LEN as usize {
        return raw as u32;
    }
    if raw == u16::MAX || raw == 0 {
        EXT2_MAX_REC_LEN
    } else {
        raw as u32
    }
}

/// 解析 `block[offset..]` 处的目录项
///
/// # 返回
///
/// * `Some((entry, next))` - 目录项和下一个目录项的偏移（按 rec_len 前进）
/// * `None` - 到达块末尾或遇到 inode 为 0 的目录项
///
/// # 错误
///
/// `Corrupted`：头部放不下、`rec_len < 8`、名称超出 `rec_len` 或超出块。
pub fn parse_entry(
    block: &[u8],
    offset: usize,
    has_filetype: bool,
) -> Result<Option<(DirEntry, usize)>> {
    if offset >= block.len() {
        return Ok(None);
    }

    let rest = &block[offset..];
    if rest.len() < EXT2_DIR_ENTRY_HEADER_SIZE {
        return Err(Error::new(
            ErrorKind::Corrupted,
            "directory entry header crosses block end",
        ));
    }

    let inode = LittleEndian::read_u32(&rest[0..]);
    if inode == 0 {
        return Ok(None);
    }

    let rec_len = rec_len_from_disk(LittleEndian::read_u16(&rest[4..]), block.len());
    let (name_len, file_type) = if has_filetype {
        (rest[6] as usize, FileType::from_raw(rest[7]))
    } else {
        // 旧格式：name_len 占两个字节
        (LittleEndian::read_u16(&rest[6..]) as usize, FileType::Unknown)
    };

    if (rec_len as usize) < EXT2_DIR_ENTRY_HEADER_SIZE {
        return Err(Error::new(
            ErrorKind::Corrupted,
            "directory entry rec_len too small",
        ));
    }

    let name_end = EXT2_DIR_ENTRY_HEADER_SIZE + name_len;
    if name_end > rec_len as usize || name_end > rest.len() {
        return Err(Error::new(
            ErrorKind::Corrupted,
            "directory entry name exceeds record",
        ));
    }

    let entry = DirEntry {
        inode,
        rec_len,
        file_type,
        name: rest[EXT2_DIR_ENTRY_HEADER_SIZE..name_end].to_vec(),
    };

    Ok(Some((entry, offset + rec_len as usize)))
}

/// 单个目录块内的目录项迭代器
pub struct DirEntryIter<'b> {
    block: &'b [u8],
    offset: usize,
    has_filetype: bool,
    done: bool,
}

impl<'b> DirEntryIter<'b> {
    pub fn new(block: &'b [u8], has_filetype: bool) -> Self {
        Self {
            block,
            offset: 0,
            has_filetype,
            done: false,
        }
    }
}

impl Iterator for DirEntryIter<'_> {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match parse_entry(self.block, self.offset, self.has_filetype) {
            Ok(Some((entry, next))) => {
                self.offset = next;
                Some(Ok(entry))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn put(block: &mut [u8], off: usize, inode: u32, rec_len: u16, ft: u8, name: &[u8]) {
        LittleEndian::write_u32(&mut block[off..], inode);
        LittleEndian::write_u16(&mut block[off + 4..], rec_len);
        block[off + 6] = name.len() as u8;
        block[off + 7] = ft;
        block[off + 8..off + 8 + name.len()].copy_from_slice(name);
    }

    #[test]
    fn test_entries_until_zero_inode() {
        let mut block = vec![0u8; 1024];
        put(&mut block, 0, 2, 12, EXT2_FT_DIR, b".");
        put(&mut block, 12, 2, 12, EXT2_FT_DIR, b"..");
        put(&mut block, 24, 12, 20, EXT2_FT_REG_FILE, b"hello.txt");
        put(&mut block, 44, 0, 980, 0, b"");

        let entries: Vec<DirEntry> = DirEntryIter::new(&block, true)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].name(), b"hello.txt");
        assert_eq!(entries[2].type_char(), 'f');
        assert_eq!(entries[1].type_char(), 'd');
    }

    #[test]
    fn test_padding_and_block_end() {
        let mut block = vec![0u8; 64];
        // rec_len 带填充，最后一项延伸到块尾之外也接受
        put(&mut block, 0, 5, 32, EXT2_FT_SYMLINK, b"link");
        put(&mut block, 32, 6, 100, EXT2_FT_FIFO, b"pipe");

        let entries: Vec<DirEntry> = DirEntryIter::new(&block, true)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_type, FileType::Symlink);
        assert_eq!(entries[1].type_char(), '?');
    }

    #[test]
    fn test_corrupt_rec_len() {
        let mut block = vec![0u8; 64];
        put(&mut block, 0, 5, 0, EXT2_FT_REG_FILE, b"a");
        let err = parse_entry(&block, 0, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);

        put(&mut block, 0, 5, 10, EXT2_FT_REG_FILE, b"abcdef");
        let err = parse_entry(&block, 0, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
    }

    #[test]
    fn test_truncated_header() {
        let mut block = vec![0u8; 16];
        put(&mut block, 0, 5, 12, EXT2_FT_REG_FILE, b"a");
        block[12] = 1;
        let mut it = DirEntryIter::new(&block, true);
        assert!(it.next().unwrap().is_ok());
        assert_eq!(it.next().unwrap().unwrap_err().kind(), ErrorKind::Corrupted);
        assert!(it.next().is_none());
    }

    #[test]
    fn test_full_64k_block_entry() {
        let mut block = vec![0u8; 65536];
        put(&mut block, 0, 2, 0xFFFF, EXT2_FT_DIR, b".");

        let entries: Vec<DirEntry> = DirEntryIter::new(&block, true)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].rec_len, 65536);

        // 前面有目录项时，最后一项的 rec_len 仍按原值解码
        put(&mut block, 0, 2, 12, EXT2_FT_DIR, b".");
        put(&mut block, 12, 3, 65524, EXT2_FT_REG_FILE, b"f");
        let entries: Vec<DirEntry> = DirEntryIter::new(&block, true)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].rec_len, 65524);

        assert_eq!(rec_len_from_disk(0xFFFF, 4096), 0xFFFF);
        assert_eq!(rec_len_from_disk(0, 65536), 65536);
    }

    #[test]
    fn test_without_filetype_feature() {
        let mut block = vec![0u8; 32];
        LittleEndian::write_u32(&mut block[0..], 7);
        LittleEndian::write_u16(&mut block[4..], 32);
        LittleEndian::write_u16(&mut block[6..], 3);
        block[8..11].copy_from_slice(b"abc");

        let (entry, next) = parse_entry(&block, 0, false).unwrap().unwrap();
        assert_eq!(entry.name_lossy(), "abc");
        assert_eq!(entry.file_type, FileType::Unknown);
        assert_eq!(next, 32);
    }
}
