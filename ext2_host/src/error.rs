//! 错误处理模块：引擎错误到负 errno 的转换。

pub use ext2_core::{Error, ErrorKind, Result};

/// 为结果类型添加上下文的 trait
pub(crate) trait Context<T> {
    /// 记录出错的操作，错误本身原样返回
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    fn context(self, context: &'static str) -> Result<T> {
        self.inspect_err(|e| debug!("{context}: {e}"))
    }
}

/// 宿主约定的错误码（负 errno）
pub fn neg_errno(err: &Error) -> i32 {
    -err.errno()
}

/// 把引擎结果折叠成 `0` / 非负计数 / 负 errno
pub(crate) trait IntoErrno {
    fn into_errno(self) -> i64;
}

impl IntoErrno for Result<()> {
    fn into_errno(self) -> i64 {
        match self {
            Ok(()) => 0,
            Err(e) => neg_errno(&e) as i64,
        }
    }
}

impl IntoErrno for Result<u32> {
    fn into_errno(self) -> i64 {
        match self {
            Ok(v) => v as i64,
            Err(e) => neg_errno(&e) as i64,
        }
    }
}

impl IntoErrno for Result<usize> {
    fn into_errno(self) -> i64 {
        match self {
            Ok(v) => v as i64,
            Err(e) => neg_errno(&e) as i64,
        }
    }
}
