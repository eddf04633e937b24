pub mod order_ctx;
pub mod order_flow;
pub mod order_state;

pub use order_ctx::OrderCtx;
pub use order_flow::{OrderFlow, OrderOutcome};
pub use order_state::{FailedStage, OrderState};
