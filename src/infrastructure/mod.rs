pub mod chrome_site;
pub mod js_executor;
pub mod robot_site;

pub use chrome_site::ChromeSite;
pub use js_executor::JsExecutor;
pub use robot_site::{RobotSite, SubmitOutcome};
