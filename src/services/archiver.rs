//! 归档 - 业务能力层
//!
//! 运行结束后把所有合成回执打成一个 zip 包

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::MissingReceiptPolicy;
use crate::error::{AppError, AppResult};

/// 归档结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// 压缩包路径
    pub archive: PathBuf,
    /// 写入的条目名（按写入顺序）
    pub entries: Vec<String>,
    /// 因文件缺失而跳过的路径
    pub skipped: Vec<PathBuf>,
}

/// 归档器
pub struct Archiver {
    policy: MissingReceiptPolicy,
}

impl Archiver {
    pub fn new(policy: MissingReceiptPolicy) -> Self {
        Self { policy }
    }

    /// 把 `files` 写入 `archive_path`，条目名为文件名
    pub fn archive(&self, files: &[PathBuf], archive_path: &Path) -> AppResult<ArchiveReport> {
        let mut present = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();
        for path in files {
            if path.is_file() {
                present.push(path);
                continue;
            }
            match self.policy {
                MissingReceiptPolicy::Skip => {
                    warn!("⚠️ 回执文件缺失，跳过: {}", path.display());
                    skipped.push(path.clone());
                }
                MissingReceiptPolicy::Fail => {
                    return Err(AppError::Archive(format!("回执文件缺失: {}", path.display())));
                }
            }
        }

        let file = File::create(archive_path)
            .map_err(|e| AppError::Archive(format!("无法创建 {}: {}", archive_path.display(), e)))?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut entries = Vec::with_capacity(present.len());
        for path in present {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| AppError::Archive(format!("无效的文件名: {}", path.display())))?;
            zip.start_file(name.clone(), options)?;
            let mut source = File::open(path)
                .map_err(|e| AppError::Archive(format!("无法读取 {}: {}", path.display(), e)))?;
            io::copy(&mut source, &mut zip)
                .map_err(|e| AppError::Archive(format!("写入 {} 失败: {}", name, e)))?;
            entries.push(name);
        }
        zip.finish()?;

        info!("📦 压缩包已创建: {} ({} 个文件)", archive_path.display(), entries.len());
        Ok(ArchiveReport {
            archive: archive_path.to_path_buf(),
            entries,
            skipped,
        })
    }
}
