//! 测试用 ext2 镜像构造器
//!
//! 在内存中按 ext2 布局拼出镜像：superblock、块组描述符表、每组一张
//! inode 表，数据块顺序分配。只写引擎会读取的字段。

#![allow(dead_code)]

use byteorder::{ByteOrder, LittleEndian};

pub const FT_REG_FILE: u8 = 1;
pub const FT_DIR: u8 = 2;
pub const FT_SYMLINK: u8 = 7;

pub const MODE_FILE: u16 = 0o100644;
pub const MODE_DIR: u16 = 0o040755;
pub const MODE_SYMLINK: u16 = 0o120777;

const INCOMPAT_FILETYPE: u32 = 0x0002;

pub struct ImageBuilder {
    block_size: usize,
    image: Vec<u8>,
    first_data_block: u32,
    inodes_per_group: u32,
    groups: u32,
    inode_size: u16,
    rev_level: u32,
    inode_tables: Vec<u32>,
    next_block: u32,
    incompat: u32,
    ro_compat: u32,
}

impl ImageBuilder {
    /// 动态版本（rev 1）镜像，inode 记录 `inode_size` 字节
    pub fn new(block_size: usize, groups: u32, inodes_per_group: u32) -> Self {
        Self::with_layout(block_size, groups, inodes_per_group, 1, 128)
    }

    /// 指定版本和 inode 记录大小
    pub fn with_layout(
        block_size: usize,
        groups: u32,
        inodes_per_group: u32,
        rev_level: u32,
        inode_size: u16,
    ) -> Self {
        let first_data_block = if block_size == 1024 { 1 } else { 0 };
        let record = if rev_level == 0 { 128 } else { inode_size as usize };

        let mut b = Self {
            block_size,
            image: Vec::new(),
            first_data_block,
            inodes_per_group,
            groups,
            inode_size,
            rev_level,
            inode_tables: Vec::new(),
            next_block: first_data_block + 2,
            incompat: INCOMPAT_FILETYPE,
            ro_compat: 0,
        };
        b.ensure_blocks(b.next_block);

        let table_blocks = (inodes_per_group as usize * record).div_ceil(block_size) as u32;
        for _ in 0..groups {
            let start = b.next_block;
            b.next_block += table_blocks;
            b.ensure_blocks(b.next_block);
            b.inode_tables.push(start);
        }

        b
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// 每个指针块的条目数
    pub fn per_block(&self) -> usize {
        self.block_size / 4
    }

    pub fn set_incompat(&mut self, bits: u32) -> &mut Self {
        self.incompat = bits;
        self
    }

    pub fn set_ro_compat(&mut self, bits: u32) -> &mut Self {
        self.ro_compat = bits;
        self
    }

    fn ensure_blocks(&mut self, blocks: u32) {
        let need = blocks as usize * self.block_size;
        if self.image.len() < need {
            self.image.resize(need, 0);
        }
    }

    /// 分配一个新的数据块
    pub fn alloc_block(&mut self) -> u32 {
        let b = self.next_block;
        self.next_block += 1;
        self.ensure_blocks(self.next_block);
        b
    }

    pub fn write_block(&mut self, block: u32, data: &[u8]) {
        assert!(data.len() <= self.block_size);
        let start = block as usize * self.block_size;
        self.image[start..start + data.len()].copy_from_slice(data);
    }

    fn write_pointer_block(&mut self, pointers: &[u32]) -> u32 {
        let block = self.alloc_block();
        let mut buf = vec![0u8; self.block_size];
        LittleEndian::write_u32_into(pointers, &mut buf[..pointers.len() * 4]);
        self.write_block(block, &buf);
        block
    }

    fn record_size(&self) -> usize {
        if self.rev_level == 0 {
            128
        } else {
            self.inode_size as usize
        }
    }

    /// inode 记录的字节偏移
    pub fn inode_offset(&self, ino: u32) -> usize {
        let group = ((ino - 1) / self.inodes_per_group) as usize;
        let index = ((ino - 1) % self.inodes_per_group) as usize;
        self.inode_tables[group] as usize * self.block_size + index * self.record_size()
    }

    /// 写入 inode 记录
    pub fn inode(&mut self, ino: u32, mode: u16, size: u64, block: [u32; 15], flags: u32) {
        let off = self.inode_offset(ino);
        let rec = &mut self.image[off..off + 128];
        rec.fill(0);
        LittleEndian::write_u16(&mut rec[0..], mode);
        LittleEndian::write_u16(&mut rec[2..], 1000);
        LittleEndian::write_u32(&mut rec[4..], size as u32);
        LittleEndian::write_u32(&mut rec[8..], 1_700_000_000);
        LittleEndian::write_u32(&mut rec[12..], 1_700_000_100);
        LittleEndian::write_u32(&mut rec[16..], 1_700_000_200);
        LittleEndian::write_u16(&mut rec[24..], 100);
        let links = if mode & 0xF000 == 0x4000 { 2 } else { 1 };
        LittleEndian::write_u16(&mut rec[26..], links);
        let data_blocks = block.iter().filter(|&&b| b != 0).count() as u32;
        LittleEndian::write_u32(&mut rec[28..], data_blocks * (self.block_size as u32 / 512));
        LittleEndian::write_u32(&mut rec[32..], flags);
        LittleEndian::write_u32_into(&block, &mut rec[40..100]);
        LittleEndian::write_u32(&mut rec[108..], (size >> 32) as u32);
    }

    /// 普通文件，所有块都分配
    pub fn file(&mut self, ino: u32, content: &[u8]) -> &mut Self {
        self.file_with_holes(ino, content, &[])
    }

    /// 普通文件，`holes` 中的逻辑块不分配
    ///
    /// 整个子树都是空洞时，对应的间接块指针保持为 0。
    pub fn file_with_holes(&mut self, ino: u32, content: &[u8], holes: &[usize]) -> &mut Self {
        let bs = self.block_size;
        let p = self.per_block();
        let n = content.len().div_ceil(bs);
        assert!(n <= 12 + p + p * p, "triple-indirect files are not built");

        let mut ptrs = vec![0u32; n];
        for (i, chunk) in content.chunks(bs).enumerate() {
            if holes.contains(&i) {
                assert!(chunk.iter().all(|&b| b == 0), "hole block {i} has data");
                continue;
            }
            let b = self.alloc_block();
            self.write_block(b, chunk);
            ptrs[i] = b;
        }

        let mut block = [0u32; 15];
        let direct = n.min(12);
        block[..direct].copy_from_slice(&ptrs[..direct]);

        if n > 12 {
            let single = &ptrs[12..n.min(12 + p)];
            if single.iter().any(|&b| b != 0) {
                block[12] = self.write_pointer_block(single);
            }
        }

        if n > 12 + p {
            let rest = ptrs[12 + p..].to_vec();
            let mut singles = Vec::new();
            for chunk in rest.chunks(p) {
                if chunk.iter().any(|&b| b != 0) {
                    singles.push(self.write_pointer_block(chunk));
                } else {
                    singles.push(0);
                }
            }
            if singles.iter().any(|&b| b != 0) {
                block[13] = self.write_pointer_block(&singles);
            }
        }

        self.inode(ino, MODE_FILE, content.len() as u64, block, 0);
        self
    }

    /// 目录：条目依次排入块中，剩余空间用一个 inode 为 0 的目录项填满
    pub fn dir(&mut self, ino: u32, entries: &[(u32, u8, &str)]) -> &mut Self {
        let bs = self.block_size;
        let mut blocks: Vec<Vec<u8>> = vec![vec![0u8; bs]];
        let mut pos = 0usize;
        let mut last = 0usize;

        let filetype = self.rev_level > 0 && self.incompat & INCOMPAT_FILETYPE != 0;

        for &(child, ft, name) in entries {
            let ft = if filetype { ft } else { 0 };
            let rec_len = (8 + name.len()).next_multiple_of(4);
            if pos + rec_len > bs {
                close_block(blocks.last_mut().unwrap(), pos, last);
                blocks.push(vec![0u8; bs]);
                pos = 0;
            }
            let buf = blocks.last_mut().unwrap();
            write_dirent(buf, pos, child, rec_len as u16, ft, name.as_bytes());
            last = pos;
            pos += rec_len;
        }
        close_block(blocks.last_mut().unwrap(), pos, last);

        assert!(blocks.len() <= 12);
        let mut block = [0u32; 15];
        for (i, data) in blocks.iter().enumerate() {
            let b = self.alloc_block();
            self.write_block(b, data);
            block[i] = b;
        }

        self.inode(ino, MODE_DIR, (blocks.len() * bs) as u64, block, 0);
        self
    }

    /// 目录，内容为调用方给出的原始块
    pub fn raw_dir(&mut self, ino: u32, data: &[u8]) -> &mut Self {
        let b = self.alloc_block();
        self.write_block(b, data);
        let mut block = [0u32; 15];
        block[0] = b;
        self.inode(ino, MODE_DIR, self.block_size as u64, block, 0);
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        let bs = self.block_size;
        let total_blocks = (self.image.len() / bs) as u32;
        let log = (bs / 1024).trailing_zeros();

        let sb = &mut self.image[1024..2048];
        LittleEndian::write_u32(&mut sb[0..], self.groups * self.inodes_per_group);
        LittleEndian::write_u32(&mut sb[4..], total_blocks);
        LittleEndian::write_u32(&mut sb[12..], 0);
        LittleEndian::write_u32(&mut sb[16..], 0);
        LittleEndian::write_u32(&mut sb[20..], self.first_data_block);
        LittleEndian::write_u32(&mut sb[24..], log);
        LittleEndian::write_u32(&mut sb[32..], 8 * bs as u32);
        LittleEndian::write_u32(&mut sb[40..], self.inodes_per_group);
        LittleEndian::write_u16(&mut sb[56..], 0xEF53);
        LittleEndian::write_u16(&mut sb[58..], 1);
        LittleEndian::write_u32(&mut sb[76..], self.rev_level);
        if self.rev_level > 0 {
            LittleEndian::write_u32(&mut sb[84..], 11);
            LittleEndian::write_u16(&mut sb[88..], self.inode_size);
            LittleEndian::write_u32(&mut sb[96..], self.incompat);
            LittleEndian::write_u32(&mut sb[100..], self.ro_compat);
        }
        sb[120..127].copy_from_slice(b"testvol");

        let gdt = (self.first_data_block as usize + 1) * bs;
        for (g, &table) in self.inode_tables.iter().enumerate() {
            let d = gdt + g * 32;
            LittleEndian::write_u32(&mut self.image[d + 8..], table);
        }

        self.image.clone()
    }
}

fn close_block(buf: &mut [u8], pos: usize, last: usize) {
    let bs = buf.len();
    if bs - pos >= 8 {
        // inode 为 0 的尾部目录项，覆盖到块尾
        write_dirent(buf, pos, 0, (bs - pos) as u16, 0, b"");
    } else if pos < bs {
        // 放不下目录项头部，并入上一个目录项
        let rec_len = LittleEndian::read_u16(&buf[last + 4..]) as usize + (bs - pos);
        LittleEndian::write_u16(&mut buf[last + 4..], rec_len as u16);
    }
}

pub fn write_dirent(buf: &mut [u8], pos: usize, inode: u32, rec_len: u16, ft: u8, name: &[u8]) {
    LittleEndian::write_u32(&mut buf[pos..], inode);
    LittleEndian::write_u16(&mut buf[pos + 4..], rec_len);
    buf[pos + 6] = name.len() as u8;
    buf[pos + 7] = ft;
    buf[pos + 8..pos + 8 + name.len()].copy_from_slice(name);
}

/// 可辨识的测试内容：每块内容不同，便于发现错位
pub fn pattern(len: usize, block_size: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| ((i % 251) as u8) ^ ((i / block_size) as u8).wrapping_mul(31) ^ seed)
        .collect()
}

/// 把 `holes` 对应的块清零
pub fn punch(content: &mut [u8], block_size: usize, holes: &[usize]) {
    for &h in holes {
        let start = h * block_size;
        let end = (start + block_size).min(content.len());
        content[start..end].fill(0);
    }
}

/// 标准测试镜像的 inode 编号
pub const HELLO_INO: u32 = 12;
pub const SUBDIR_INO: u32 = 13;
pub const BIG_INO: u32 = 14;
pub const SPARSE_INO: u32 = 15;
pub const LINK_INO: u32 = 16;
/// 位于第二个块组
pub const FAR_INO: u32 = 20;

pub const HELLO: &[u8] = b"Hello, ext2!\n";

pub struct StandardImage {
    pub image: Vec<u8>,
    pub big: Vec<u8>,
    pub sparse: Vec<u8>,
    pub sparse_holes: Vec<usize>,
    pub far: Vec<u8>,
}

/// 标准镜像
///
/// ```text
/// /               (2)
/// ├── hello.txt   (12)
/// └── subdir      (13)
///     ├── big.bin     (14)  直接块 + 一级 + 二级间接块
///     ├── sparse.bin  (15)  直接块空洞，整个一级间接区缺失
///     ├── link        (16)  符号链接
///     └── far.txt     (20)  第二个块组
/// ```
pub fn standard_image(block_size: usize) -> StandardImage {
    let mut b = ImageBuilder::new(block_size, 2, 16);
    let p = b.per_block();

    let big = pattern((12 + p + 5) * block_size + 123, block_size, 0x5a);

    let sparse_blocks = 12 + p + 3;
    let mut sparse_holes = vec![1, 2];
    sparse_holes.extend(12..12 + p);
    let mut sparse = pattern(sparse_blocks * block_size + 10, block_size, 0x11);
    punch(&mut sparse, block_size, &sparse_holes);

    let far = pattern(block_size * 2 + 7, block_size, 0x77);

    b.dir(
        2,
        &[
            (2, FT_DIR, "."),
            (2, FT_DIR, ".."),
            (HELLO_INO, FT_REG_FILE, "hello.txt"),
            (SUBDIR_INO, FT_DIR, "subdir"),
        ],
    )
    .file(HELLO_INO, HELLO)
    .dir(
        SUBDIR_INO,
        &[
            (SUBDIR_INO, FT_DIR, "."),
            (2, FT_DIR, ".."),
            (BIG_INO, FT_REG_FILE, "big.bin"),
            (SPARSE_INO, FT_REG_FILE, "sparse.bin"),
            (LINK_INO, FT_SYMLINK, "link"),
            (FAR_INO, FT_REG_FILE, "far.txt"),
        ],
    )
    .file(BIG_INO, &big)
    .file_with_holes(SPARSE_INO, &sparse, &sparse_holes)
    .file(FAR_INO, &far);

    b.inode(LINK_INO, MODE_SYMLINK, 0, [0; 15], 0);

    StandardImage {
        image: b.finish(),
        big,
        sparse,
        sparse_holes,
        far,
    }
}
