pub mod connection;
pub mod headless;

use chromiumoxide::{Browser, Page};

use crate::config::Config;
use crate::error::AppResult;

pub use connection::connect_to_browser_and_page;
pub use headless::launch_headless_browser;

/// 根据配置获取浏览器会话：有调试端口时连接已有浏览器，否则启动无头浏览器
pub async fn open_session(config: &Config) -> AppResult<(Browser, Page)> {
    match config.browser_debug_port {
        Some(port) => connect_to_browser_and_page(port, &config.site_url).await,
        None => launch_headless_browser(&config.site_url, config.chrome_executable.as_deref()).await,
    }
}
