//! 宿主测试辅助：把内存镜像写成临时文件再挂载

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

#[path = "../../../ext2_core/tests/common/mod.rs"]
mod image;

pub use image::*;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// 临时镜像文件，drop 时删除
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    pub fn new(data: &[u8]) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "ext2_host_test_{}_{id}.img",
            std::process::id()
        ));
        fs::write(&path, data).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Drop for ImageFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
