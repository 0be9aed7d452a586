//! Per-stage input context construction.
//!
//! Context propagation between stages is explicit and textual: every stage
//! receives the original brief plus the verbatim output of the prior stages
//! its template names. The generation backend is never trusted to remember
//! anything between calls.

use crate::core::StageRole;

/// Accumulated verbatim outputs of completed stages within one run.
#[derive(Debug, Clone, Default)]
pub struct StageOutputs {
    /// The project manager's plan.
    pub plan: Option<String>,
    /// The vision document from the ba stage.
    pub vision: Option<String>,
    /// The use cases document from the ux stage.
    pub usecases: Option<String>,
}

impl StageOutputs {
    /// Records one stage's output. The ui stage feeds no later stage, so its
    /// output is not kept.
    pub fn record(&mut self, role: StageRole, text: String) {
        match role {
            StageRole::Pm => self.plan = Some(text),
            StageRole::Ba => self.vision = Some(text),
            StageRole::Ux => self.usecases = Some(text),
            StageRole::Ui => {}
        }
    }
}

/// Builds the generation input for one stage from the brief and the prior
/// outputs its template names.
#[must_use]
pub fn build_context(role: StageRole, brief: &str, outputs: &StageOutputs) -> String {
    match role {
        StageRole::Pm => format!("Project Brief: {brief}"),
        StageRole::Ba => format!(
            "Project Brief: {brief}\n\nProject Manager's Plan:\n{}",
            outputs.plan.as_deref().unwrap_or_default()
        ),
        StageRole::Ux => format!(
            "Project Brief: {brief}\n\nVision Document:\n{}",
            outputs.vision.as_deref().unwrap_or_default()
        ),
        StageRole::Ui => format!(
            "Project Brief: {brief}\n\nVision Document:\n{}\n\nUse Cases:\n{}\n\n\
Create a complete HTML prototype based on all of the above.",
            outputs.vision.as_deref().unwrap_or_default(),
            outputs.usecases.as_deref().unwrap_or_default()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_outputs() -> StageOutputs {
        let mut outputs = StageOutputs::default();
        outputs.record(StageRole::Pm, "the plan".to_string());
        outputs.record(StageRole::Ba, "the vision".to_string());
        outputs.record(StageRole::Ux, "the use cases".to_string());
        outputs
    }

    #[test]
    fn test_pm_context_is_brief_only() {
        let context = build_context(StageRole::Pm, "A todo app", &StageOutputs::default());
        assert_eq!(context, "Project Brief: A todo app");
    }

    #[test]
    fn test_ba_context_includes_plan_verbatim() {
        let context = build_context(StageRole::Ba, "A todo app", &full_outputs());
        assert_eq!(
            context,
            "Project Brief: A todo app\n\nProject Manager's Plan:\nthe plan"
        );
    }

    #[test]
    fn test_ux_context_includes_vision_verbatim() {
        let context = build_context(StageRole::Ux, "A todo app", &full_outputs());
        assert_eq!(
            context,
            "Project Brief: A todo app\n\nVision Document:\nthe vision"
        );
    }

    #[test]
    fn test_ui_context_includes_vision_and_usecases() {
        let context = build_context(StageRole::Ui, "A todo app", &full_outputs());
        assert!(context.starts_with("Project Brief: A todo app"));
        assert!(context.contains("Vision Document:\nthe vision"));
        assert!(context.contains("Use Cases:\nthe use cases"));
        assert!(context.ends_with("Create a complete HTML prototype based on all of the above."));
    }

    #[test]
    fn test_ui_output_not_recorded() {
        let mut outputs = StageOutputs::default();
        outputs.record(StageRole::Ui, "<!DOCTYPE html>".to_string());
        assert_eq!(outputs.plan, None);
        assert_eq!(outputs.vision, None);
        assert_eq!(outputs.usecases, None);
    }
}
