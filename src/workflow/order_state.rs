//! 单个订单的状态机
//!
//! ```text
//! Pending → FormFilled → Submitted{n} → Succeeded → Exported → Composed → Archived
//!                            │                         │          │
//!                            └──────────→ Failed ←─────┴──────────┘
//! ```

use std::fmt;

/// 进入 Failed 时所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Submission,
    Export,
    Composition,
}

impl fmt::Display for FailedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailedStage::Submission => "提交",
            FailedStage::Export => "导出",
            FailedStage::Composition => "合成",
        };
        f.write_str(name)
    }
}

/// 订单状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderState {
    Pending,
    FormFilled,
    Submitted { attempts: usize },
    Succeeded,
    Exported,
    Composed,
    Archived,
    Failed { stage: FailedStage, reason: String },
}

impl OrderState {
    /// 是否允许从当前状态进入 `next`
    pub fn can_advance_to(&self, next: &OrderState) -> bool {
        use OrderState::*;
        match (self, next) {
            (Pending, FormFilled) => true,
            (FormFilled, Submitted { .. }) => true,
            (Submitted { attempts: a }, Submitted { attempts: b }) => b > a,
            (Submitted { .. }, Succeeded) => true,
            (Succeeded, Exported) => true,
            (Exported, Composed) => true,
            (Composed, Archived) => true,
            (Pending | FormFilled | Submitted { .. }, Failed { stage: FailedStage::Submission, .. }) => true,
            (Succeeded | Exported, Failed { stage: FailedStage::Export, .. }) => true,
            (Exported | Composed, Failed { stage: FailedStage::Composition, .. }) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Archived | OrderState::Failed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, OrderState::Failed { .. })
    }
}
