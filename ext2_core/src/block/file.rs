//! 基于宿主文件的镜像设备

use std::{fs::File, io, os::unix::fs::FileExt, path::Path};

use super::BlockDevice;
use crate::error::Result;

/// 以只读方式打开的镜像文件
///
/// 使用 `pread` 语义的定位读取，不修改文件游标，可在多个线程间共享。
#[derive(Debug)]
pub struct FileDevice {
    file: File,
    total_size: u64,
}

impl FileDevice {
    /// 只读打开镜像
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_file(file)
    }

    /// 包装一个已打开的文件
    pub fn from_file(file: File) -> io::Result<Self> {
        let total_size = file.metadata()?.len();
        Ok(Self { file, total_size })
    }
}

impl BlockDevice for FileDevice {
    fn total_size(&self) -> u64 {
        self.total_size
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let mut done = 0;
        while done < buf.len() {
            match self.file.read_at(&mut buf[done..], offset + done as u64) {
                Ok(0) => break,
                Ok(n) => done += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(done)
    }
}
