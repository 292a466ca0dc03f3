use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{AppError, AppResult};

const FILL_BLOCK_SIZE: usize = 32 * 1024;

fn disk_error(code: &str, message: impl Into<String>) -> AppError {
    AppError::new(code, "预留磁盘空间失败").with_detail(message.into())
}

// Claims the full destination size up front by writing real zero blocks,
// so later positioned writes cannot hit ENOSPC mid-transfer. A sparse
// set_len would defer the allocation and defeat that guarantee.
pub fn reserve_space(path: &Path, total_size: u64) -> AppResult<File> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).map_err(|error| {
            disk_error(
                "receive_dir_create_failed",
                format!("{}: {}", parent.display(), error),
            )
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(path)
        .map_err(|error| {
            disk_error(
                "receive_file_open_failed",
                format!("{}: {}", path.display(), error),
            )
        })?;

    file.set_len(total_size).map_err(|error| {
        disk_error(
            "receive_preallocate_failed",
            format!("{}: {}", path.display(), error),
        )
    })?;

    let block = [0u8; FILL_BLOCK_SIZE];
    let mut remaining = total_size;
    while remaining > 0 {
        let step = remaining.min(FILL_BLOCK_SIZE as u64) as usize;
        file.write_all(&block[..step]).map_err(|error| {
            disk_error(
                "receive_preallocate_failed",
                format!("{}: {}", path.display(), error),
            )
        })?;
        remaining -= step as u64;
    }

    file.seek(SeekFrom::Start(0)).map_err(|error| {
        disk_error(
            "receive_seek_failed",
            format!("{}: {}", path.display(), error),
        )
    })?;
    Ok(file)
}
