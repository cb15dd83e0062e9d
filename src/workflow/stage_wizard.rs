//! 扫描批改三步向导：扫描 → 调整 → 结果

use crate::error::WorkflowError;

/// 向导阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Scan,
    Adjust,
    Result,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Scan, Stage::Adjust, Stage::Result];

    /// 阶段序号，范围 [0, 2]
    pub fn index(self) -> usize {
        match self {
            Stage::Scan => 0,
            Stage::Adjust => 1,
            Stage::Result => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Scan => "scan",
            Stage::Adjust => "adjust",
            Stage::Result => "result",
        }
    }
}

/// 向导按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Back,
    Next,
    Submit,
}

impl WizardAction {
    fn name(self) -> &'static str {
        match self {
            WizardAction::Back => "back",
            WizardAction::Next => "next",
            WizardAction::Submit => "submit",
        }
    }
}

/// 三步向导
#[derive(Debug, Clone, Default)]
pub struct StageWizard {
    stage: Stage,
}

impl StageWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn index(&self) -> usize {
        self.stage.index()
    }

    /// 当前阶段可用的按钮
    pub fn available_actions(&self) -> &'static [WizardAction] {
        match self.stage {
            Stage::Scan => &[WizardAction::Next],
            Stage::Adjust => &[WizardAction::Back, WizardAction::Submit],
            Stage::Result => &[WizardAction::Back],
        }
    }

    pub fn next(&mut self) -> Result<Stage, WorkflowError> {
        self.apply(WizardAction::Next)
    }

    pub fn submit(&mut self) -> Result<Stage, WorkflowError> {
        self.apply(WizardAction::Submit)
    }

    pub fn back(&mut self) -> Result<Stage, WorkflowError> {
        self.apply(WizardAction::Back)
    }

    /// 执行按钮动作；不允许的动作不改变阶段
    pub fn apply(&mut self, action: WizardAction) -> Result<Stage, WorkflowError> {
        let next = match (self.stage, action) {
            (Stage::Scan, WizardAction::Next) => Stage::Adjust,
            (Stage::Adjust, WizardAction::Submit) => Stage::Result,
            (Stage::Adjust, WizardAction::Back) => Stage::Scan,
            (Stage::Result, WizardAction::Back) => Stage::Adjust,
            (stage, action) => {
                return Err(WorkflowError::InvalidTransition {
                    stage: stage.name(),
                    action: action.name(),
                })
            }
        };
        self.stage = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_scan_with_only_next() {
        let wizard = StageWizard::new();
        assert_eq!(wizard.stage(), Stage::Scan);
        assert_eq!(wizard.available_actions(), &[WizardAction::Next]);
    }

    #[test]
    fn test_full_walk() {
        let mut wizard = StageWizard::new();
        assert_eq!(wizard.next().unwrap(), Stage::Adjust);
        assert_eq!(
            wizard.available_actions(),
            &[WizardAction::Back, WizardAction::Submit]
        );
        assert_eq!(wizard.submit().unwrap(), Stage::Result);
        assert_eq!(wizard.available_actions(), &[WizardAction::Back]);
        assert_eq!(wizard.back().unwrap(), Stage::Adjust);
        assert_eq!(wizard.back().unwrap(), Stage::Scan);
    }

    #[test]
    fn test_invalid_actions_leave_stage_unchanged() {
        let mut wizard = StageWizard::new();
        assert!(wizard.back().is_err());
        assert!(wizard.submit().is_err());
        assert_eq!(wizard.stage(), Stage::Scan);

        wizard.next().unwrap();
        wizard.submit().unwrap();
        assert_eq!(
            wizard.next().unwrap_err(),
            WorkflowError::InvalidTransition {
                stage: "result",
                action: "next"
            }
        );
        assert_eq!(wizard.stage(), Stage::Result);
    }

    #[test]
    fn test_index_stays_in_range() {
        let mut wizard = StageWizard::new();
        for action in [
            WizardAction::Back,
            WizardAction::Next,
            WizardAction::Next,
            WizardAction::Submit,
            WizardAction::Submit,
            WizardAction::Back,
            WizardAction::Back,
            WizardAction::Back,
        ] {
            let _ = wizard.apply(action);
            assert!(wizard.index() <= 2);
        }
        assert_eq!(Stage::ALL.map(Stage::index), [0, 1, 2]);
    }
}
