use thiserror::Error;

/// 应用程序错误类型
///
/// 前三类（下载、解析、车型目录）在处理任何订单之前出现，整个运行终止；
/// 提交、导出、合成错误只影响单个订单；归档错误在运行末尾终止程序。
#[derive(Debug, Error)]
pub enum AppError {
    /// 订单 CSV 下载失败
    #[error("下载失败 ({url}): {source}")]
    Download {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// CSV 行不符合列结构
    #[error("CSV 解析失败 (第 {row} 行): {message}")]
    Parse { row: usize, message: String },

    /// 车型目录表无法定位或解析
    #[error("车型目录不可用: {0}")]
    CatalogUnavailable(String),

    /// 多次提交后仍未成功
    #[error("订单 #{order_number} 提交失败 (已尝试 {attempts} 次): {reason}")]
    Submission {
        order_number: u32,
        attempts: usize,
        reason: String,
    },

    /// 确认页缺少回执或预览元素
    #[error("导出回执失败: {0}")]
    Export(String),

    /// 截图嵌入回执失败
    #[error("合成回执失败: {0}")]
    Composition(String),

    /// 打包压缩失败
    #[error("归档失败: {0}")]
    Archive(String),

    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(String),

    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl AppError {
    /// 是否应终止整个运行
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Download { .. }
                | AppError::Parse { .. }
                | AppError::CatalogUnavailable(_)
                | AppError::Archive(_)
        )
    }
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Browser(format!("脚本返回值无法解析: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io {
            path: String::new(),
            source: err,
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        // csv 的行号包含表头，从 1 开始
        let row = err.position().map(|p| p.line() as usize).unwrap_or(0);
        AppError::Parse {
            row,
            message: err.to_string(),
        }
    }
}

impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::Composition(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Composition(format!("截图无法解码: {}", err))
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Archive(err.to_string())
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建带路径的文件错误
    pub fn io_at(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// 创建下载错误
    pub fn download_failed(url: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Download {
            url: url.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
