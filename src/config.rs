use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 归档时发现缺少回执文件的处理策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingReceiptPolicy {
    /// 记录警告并跳过
    #[default]
    Skip,
    /// 整个归档步骤失败
    Fail,
}

impl FromStr for MissingReceiptPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            other => Err(format!("未知的缺失回执策略: {}", other)),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 下单页面 URL
    pub site_url: String,
    /// 订单 CSV 下载地址
    pub orders_csv_url: String,
    /// 输出目录（回执、截图、合成 PDF、压缩包）
    pub output_dir: PathBuf,
    /// 单个订单最多提交次数
    pub max_submission_attempts: usize,
    /// 两次提交之间的等待时间
    pub submission_retry_delay: Duration,
    /// 等待弹窗出现的时间
    pub modal_timeout: Duration,
    /// 等待页面元素出现的时间
    pub element_timeout: Duration,
    /// 浏览器调试端口，设置后连接已有浏览器，否则启动无头浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径
    pub chrome_executable: Option<PathBuf>,
    /// 归档缺少回执时的策略
    pub missing_receipt_policy: MissingReceiptPolicy,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            output_dir: PathBuf::from("output"),
            max_submission_attempts: 5,
            submission_retry_delay: Duration::ZERO,
            modal_timeout: Duration::from_millis(2000),
            element_timeout: Duration::from_millis(5000),
            browser_debug_port: None,
            chrome_executable: None,
            missing_receipt_policy: MissingReceiptPolicy::Skip,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置，无法解析的值回退到默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        Self {
            site_url: lookup("SITE_URL").unwrap_or(default.site_url),
            orders_csv_url: lookup("ORDERS_CSV_URL").unwrap_or(default.orders_csv_url),
            output_dir: lookup("OUTPUT_DIR").map(PathBuf::from).unwrap_or(default.output_dir),
            max_submission_attempts: parsed("MAX_SUBMISSION_ATTEMPTS")
                .map(|v| v as usize)
                .filter(|v| *v > 0)
                .unwrap_or(default.max_submission_attempts),
            submission_retry_delay: parsed("SUBMISSION_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(default.submission_retry_delay),
            modal_timeout: parsed("MODAL_TIMEOUT_MS").map(Duration::from_millis).unwrap_or(default.modal_timeout),
            element_timeout: parsed("ELEMENT_TIMEOUT_MS").map(Duration::from_millis).unwrap_or(default.element_timeout),
            browser_debug_port: lookup("BROWSER_DEBUG_PORT")
                .and_then(|v| v.trim().parse().ok())
                .or(default.browser_debug_port),
            chrome_executable: lookup("CHROME_EXECUTABLE").map(PathBuf::from).or(default.chrome_executable),
            missing_receipt_policy: lookup("MISSING_RECEIPT_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.missing_receipt_policy),
            verbose_logging: lookup("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
