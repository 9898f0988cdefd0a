use crate::collapse::CollapseMode;
use crate::colorize::ColorMode;
use crate::error::PipelineError;
use crate::pipeline::GenerationRequest;
use crate::range_filter::FourthDimWindow;
use crate::rotation::{RotationAngles, RotationPlane};

/// Smallest allowed distance between the effective window bounds.
pub const MIN_WINDOW_GAP: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlAction {
    NudgeRotation { plane: RotationPlane, delta: f32 },
    CycleCollapse,
    ToggleColoring,
    NudgeWindowMin(f32),
    /// Moves the effective upper bound, not the raw control.
    NudgeWindowMax(f32),
    Reset,
    Regenerate,
}

/// Values the slider and dropdown widgets would hold. All sliders are normalized to [0,1].
#[derive(Clone, Debug, PartialEq)]
pub struct ControlPanel {
    /// Indexed by `RotationPlane::index`.
    pub rotation: [f32; 6],
    pub fourth_dim_min: f32,
    /// Stored inverted: the effective upper bound is `1 - fourth_dim_max`.
    pub fourth_dim_max: f32,
    pub collapse_selector: i32,
    pub coloring_selector: i32,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            rotation: [0.0; 6],
            fourth_dim_min: 0.0,
            fourth_dim_max: 0.0,
            collapse_selector: CollapseMode::DropW.selector(),
            coloring_selector: ColorMode::Position.selector(),
        }
    }
}

impl ControlPanel {
    pub fn rotation_control(&self, plane: RotationPlane) -> f32 {
        self.rotation[plane.index()]
    }

    pub fn set_rotation_control(&mut self, plane: RotationPlane, value: f32) {
        self.rotation[plane.index()] = value.clamp(0.0, 1.0);
    }

    /// Rotation sliders wrap around since 0 and 1 are the same angle.
    pub fn nudge_rotation(&mut self, plane: RotationPlane, delta: f32) {
        let value = (self.rotation_control(plane) + delta).rem_euclid(1.0);
        self.rotation[plane.index()] = value;
    }

    pub fn effective_window(&self) -> (f32, f32) {
        (self.fourth_dim_min, 1.0 - self.fourth_dim_max)
    }

    pub fn window(&self) -> Result<FourthDimWindow, PipelineError> {
        let (min, max) = self.effective_window();
        FourthDimWindow::new(min, max)
    }

    /// Sets the lower bound, pushing the upper bound up if the gap would close.
    pub fn set_fourth_dim_min(&mut self, value: f32) {
        self.fourth_dim_min = value.clamp(0.0, 1.0);
        let (min, max) = self.effective_window();
        if min >= max - MIN_WINDOW_GAP {
            let max = (min + MIN_WINDOW_GAP).clamp(0.0, 1.0);
            self.fourth_dim_max = 1.0 - max;
        }
    }

    /// Sets the raw (inverted) upper control, pulling the lower bound down if the gap would close.
    pub fn set_fourth_dim_max(&mut self, raw: f32) {
        self.fourth_dim_max = raw.clamp(0.0, 1.0);
        let (min, max) = self.effective_window();
        if max <= min + MIN_WINDOW_GAP {
            self.fourth_dim_min = (max - MIN_WINDOW_GAP).clamp(0.0, 1.0);
        }
    }

    pub fn collapse_mode(&self) -> Result<CollapseMode, PipelineError> {
        CollapseMode::try_from(self.collapse_selector)
    }

    pub fn color_mode(&self) -> ColorMode {
        ColorMode::from_selector(self.coloring_selector)
    }

    pub fn angles(&self) -> RotationAngles {
        RotationAngles::from_controls(self.rotation)
    }

    pub fn apply(&mut self, action: ControlAction) {
        match action {
            ControlAction::NudgeRotation { plane, delta } => self.nudge_rotation(plane, delta),
            ControlAction::CycleCollapse => {
                self.collapse_selector = self.collapse_mode().unwrap_or_default().next().selector();
            }
            ControlAction::ToggleColoring => {
                self.coloring_selector = self.color_mode().toggle().selector();
            }
            ControlAction::NudgeWindowMin(delta) => self.set_fourth_dim_min(self.fourth_dim_min + delta),
            ControlAction::NudgeWindowMax(delta) => {
                let (_, max) = self.effective_window();
                self.set_fourth_dim_max(1.0 - (max + delta));
            }
            ControlAction::Reset => *self = Self::default(),
            ControlAction::Regenerate => {}
        }
    }

    pub fn request(&self) -> GenerationRequest {
        let (min_percent, max_percent) = self.effective_window();
        GenerationRequest {
            angles: self.angles(),
            collapse_selector: self.collapse_selector,
            coloring_selector: self.coloring_selector,
            min_percent,
            max_percent,
        }
    }

    pub fn summary(&self) -> String {
        let (min, max) = self.effective_window();
        let collapse = self.collapse_mode().map(CollapseMode::label).unwrap_or("invalid collapse");
        let rotations: Vec<String> = RotationPlane::ALL
            .iter()
            .map(|&plane| format!("{}={:.3}", plane.label(), self.rotation_control(plane)))
            .collect();
        format!(
            "{} | {} coloring | window [{min:.2}, {max:.2}] | {}",
            collapse,
            self.color_mode().label(),
            rotations.join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_full_range() {
        let panel = ControlPanel::default();
        assert_eq!(panel.effective_window(), (0.0, 1.0));
        assert_eq!(panel.window(), Ok(FourthDimWindow::FULL));
    }

    #[test]
    fn raising_min_pushes_max_up() {
        let mut panel = ControlPanel::default();
        panel.set_fourth_dim_max(0.5);
        panel.set_fourth_dim_min(0.6);
        let (min, max) = panel.effective_window();
        assert_eq!(min, 0.6);
        assert!((max - 0.61).abs() < 1e-6);
        assert!(panel.window().is_ok());
    }

    #[test]
    fn lowering_max_pulls_min_down() {
        let mut panel = ControlPanel::default();
        panel.set_fourth_dim_min(0.4);
        panel.set_fourth_dim_max(0.7);
        let (min, max) = panel.effective_window();
        assert!((max - 0.3).abs() < 1e-6);
        assert!((min - 0.29).abs() < 1e-6);
    }

    #[test]
    fn untouched_bound_stays_when_gap_is_wide() {
        let mut panel = ControlPanel::default();
        panel.set_fourth_dim_min(0.2);
        panel.set_fourth_dim_max(0.3);
        let (min, max) = panel.effective_window();
        assert_eq!(min, 0.2);
        assert!((max - 0.7).abs() < 1e-6);
    }

    #[test]
    fn adjusted_bound_is_clamped() {
        let mut panel = ControlPanel::default();
        panel.set_fourth_dim_max(1.0);
        assert_eq!(panel.effective_window(), (0.0, 0.0));
        assert!(panel.window().is_err());
    }

    #[test]
    fn rotation_nudges_wrap() {
        let mut panel = ControlPanel::default();
        panel.nudge_rotation(RotationPlane::Xw, -0.25);
        assert!((panel.rotation_control(RotationPlane::Xw) - 0.75).abs() < 1e-6);
        panel.nudge_rotation(RotationPlane::Xw, 0.5);
        assert!((panel.rotation_control(RotationPlane::Xw) - 0.25).abs() < 1e-6);
        assert_eq!(panel.rotation_control(RotationPlane::Zw), 0.0);
    }

    #[test]
    fn actions_cycle_selectors_and_reset() {
        let mut panel = ControlPanel::default();
        panel.apply(ControlAction::CycleCollapse);
        assert_eq!(panel.collapse_mode(), Ok(CollapseMode::DropX));
        panel.apply(ControlAction::ToggleColoring);
        assert_eq!(panel.color_mode(), ColorMode::Gradient);
        panel.apply(ControlAction::NudgeWindowMax(-0.25));
        assert!((panel.effective_window().1 - 0.75).abs() < 1e-6);
        panel.apply(ControlAction::Reset);
        assert_eq!(panel, ControlPanel::default());
    }

    #[test]
    fn invalid_collapse_selector_recovers_on_cycle() {
        let mut panel = ControlPanel { collapse_selector: 9, ..Default::default() };
        assert!(panel.collapse_mode().is_err());
        panel.apply(ControlAction::CycleCollapse);
        assert_eq!(panel.collapse_mode(), Ok(CollapseMode::DropX));
    }

    #[test]
    fn request_scales_controls_to_radians() {
        let mut panel = ControlPanel::default();
        panel.set_rotation_control(RotationPlane::Xy, 0.5);
        let request = panel.request();
        assert!((request.angles.xy - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(request.angles.zw, 0.0);
        assert_eq!((request.min_percent, request.max_percent), (0.0, 1.0));
    }
}
