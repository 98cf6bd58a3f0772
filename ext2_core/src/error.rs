//! 错误处理模块

use core::fmt;

use crate::consts::*;

/// 错误分类
///
/// 每一类对应一个固定的 errno，宿主侧直接取负数返回给调用者。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 底层读取失败或读取长度不足
    Io,
    /// 路径分量或 inode 不存在
    NotFound,
    /// 路径穿过了非目录
    NotADirectory,
    /// 需要普通文件却得到目录
    IsADirectory,
    /// 磁盘结构不满足不变量（目录项长度、间接块等）
    Corrupted,
    /// 参数无效（inode 编号、非绝对路径等）
    InvalidInput,
    /// 格式合法但本实现不支持（三级间接块、extent）
    Unsupported,
    /// 只读文件系统上的写操作
    ReadOnly,
}

impl ErrorKind {
    /// 该分类的默认 errno
    pub fn errno(self) -> i32 {
        match self {
            ErrorKind::Io => EIO,
            ErrorKind::NotFound => ENOENT,
            ErrorKind::NotADirectory => ENOTDIR,
            ErrorKind::IsADirectory => EISDIR,
            ErrorKind::Corrupted => EUCLEAN,
            ErrorKind::InvalidInput | ErrorKind::Unsupported => EINVAL,
            ErrorKind::ReadOnly => EROFS,
        }
    }
}

/// ext2 错误类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    errno: i32,
    message: &'static str,
}

impl Error {
    pub fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            errno: kind.errno(),
            message,
        }
    }

    /// I/O 错误，保留底层返回的错误码
    pub fn io(errno: i32, message: &'static str) -> Self {
        Self {
            kind: ErrorKind::Io,
            errno: if errno > 0 { errno } else { EIO },
            message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 正数 errno
    pub fn errno(&self) -> i32 {
        self.errno
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (errno={}): {}", self.kind, self.errno, self.message)
    }
}

impl core::error::Error for Error {}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(err.raw_os_error().unwrap_or(EIO), "image read failed")
    }
}

/// ext2 Result 类型
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_mapping() {
        assert_eq!(Error::new(ErrorKind::NotFound, "x").errno(), ENOENT);
        assert_eq!(Error::new(ErrorKind::NotADirectory, "x").errno(), ENOTDIR);
        assert_eq!(Error::new(ErrorKind::Corrupted, "x").errno(), EUCLEAN);
        assert_eq!(Error::new(ErrorKind::Unsupported, "x").errno(), EINVAL);
    }

    #[test]
    fn test_io_error_keeps_code() {
        let err = Error::io(13, "denied");
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.errno(), 13);

        // 非正数的错误码退化为 EIO
        assert_eq!(Error::io(0, "short read").errno(), EIO);
    }
}
