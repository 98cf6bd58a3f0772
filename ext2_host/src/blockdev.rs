//! 镜像打开：以只读方式打开宿主上的镜像文件并挂载。

use std::path::Path;

use ext2_core::{BlockDev, Ext2FileSystem, FileDevice, FsConfig};

use crate::error::{Context, Result};

/// 基于宿主文件的 ext2 会话
pub type Ext2Image = Ext2FileSystem<FileDevice>;

/// 以默认选项打开并挂载镜像
pub fn open_image<P: AsRef<Path>>(path: P) -> Result<Ext2Image> {
    open_image_with_config(path, FsConfig::default())
}

/// 以指定选项打开并挂载镜像
pub fn open_image_with_config<P: AsRef<Path>>(path: P, config: FsConfig) -> Result<Ext2Image> {
    let path = path.as_ref();
    let device = FileDevice::open(path).map_err(ext2_core::Error::from).context("open image")?;
    info!("opened image {} ({} bytes)", path.display(), ext2_core::BlockDevice::total_size(&device));

    Ext2FileSystem::mount_with_config(BlockDev::new(device), config).context("mount")
}
