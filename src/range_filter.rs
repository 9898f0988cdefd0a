use log::debug;

use crate::collapse::CollapsedPoints;
use crate::error::PipelineError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn of<I: IntoIterator<Item = f32>>(values: I) -> Result<Self, PipelineError> {
        values
            .into_iter()
            .fold(None, |range: Option<ValueRange>, v| match range {
                None => Some(ValueRange::new(v, v)),
                Some(r) => Some(ValueRange::new(r.min.min(v), r.max.max(v))),
            })
            .ok_or(PipelineError::EmptySet)
    }

    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0
    }

    /// Position of `value` inside the range, clamped to [0,1].
    pub fn inverse_lerp(&self, value: f32) -> Result<f32, PipelineError> {
        if self.is_degenerate() {
            return Err(PipelineError::DegenerateRange { min: self.min, max: self.max });
        }
        Ok(((value - self.min) / self.width()).clamp(0.0, 1.0))
    }

    /// Like `inverse_lerp`, but a zero-width range maps everything to 0.
    pub fn normalize(&self, value: f32) -> f32 {
        self.inverse_lerp(value).unwrap_or(0.0)
    }
}

/// Visible slice of the collapsed axis, as fractions of its observed range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FourthDimWindow {
    min_percent: f32,
    max_percent: f32,
}

impl FourthDimWindow {
    pub const FULL: FourthDimWindow = FourthDimWindow { min_percent: 0.0, max_percent: 1.0 };

    pub fn new(min_percent: f32, max_percent: f32) -> Result<Self, PipelineError> {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if !(in_unit(min_percent) && in_unit(max_percent) && min_percent < max_percent) {
            return Err(PipelineError::InvalidRange { min: min_percent, max: max_percent });
        }
        Ok(Self { min_percent, max_percent })
    }

    pub fn min_percent(&self) -> f32 {
        self.min_percent
    }

    pub fn max_percent(&self) -> f32 {
        self.max_percent
    }

    pub fn width(&self) -> f32 {
        self.max_percent - self.min_percent
    }

    pub fn contains(&self, t: f32) -> bool {
        t >= self.min_percent && t <= self.max_percent
    }
}

impl Default for FourthDimWindow {
    fn default() -> Self {
        Self::FULL
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilteredPoints {
    pub positions: Vec<[f32; 3]>,
    pub values: Vec<f32>,
    /// Range of the collapsed values before filtering; used for selection.
    pub selection_range: ValueRange,
    /// Range of the surviving values; used to normalize them for coloring.
    pub visible_range: ValueRange,
}

impl FilteredPoints {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub fn filter_by_window(
    points: CollapsedPoints,
    window: FourthDimWindow,
) -> Result<FilteredPoints, PipelineError> {
    let selection_range = ValueRange::of(points.values.iter().copied())?;
    select_within(points, window, selection_range)
}

/// Keeps the points whose value, normalized against `selection_range`, lies inside `window`,
/// then measures the survivors' own range.
pub fn select_within(
    points: CollapsedPoints,
    window: FourthDimWindow,
    selection_range: ValueRange,
) -> Result<FilteredPoints, PipelineError> {
    if selection_range.is_degenerate() {
        debug!(
            "range filter: collapsed values all equal {}, treating them as t=0",
            selection_range.min
        );
    }

    let CollapsedPoints { positions, values } = points;
    let mut kept_positions = Vec::with_capacity(positions.len());
    let mut kept_values = Vec::with_capacity(values.len());
    for (position, value) in positions.into_iter().zip(values) {
        if window.contains(selection_range.normalize(value)) {
            kept_positions.push(position);
            kept_values.push(value);
        }
    }

    let visible_range = ValueRange::of(kept_values.iter().copied())?;
    Ok(FilteredPoints {
        positions: kept_positions,
        values: kept_values,
        selection_range,
        visible_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> CollapsedPoints {
        let mut points = CollapsedPoints::default();
        for i in 0..=n {
            points.push([i as f32, 0.0, -(i as f32)], i as f32);
        }
        points
    }

    #[test]
    fn full_window_keeps_everything() {
        let filtered = filter_by_window(ramp(100), FourthDimWindow::FULL).unwrap();
        assert_eq!(filtered.len(), 101);
        assert_eq!(filtered.selection_range, filtered.visible_range);
    }

    #[test]
    fn window_selects_by_fraction_of_observed_range() {
        let window = FourthDimWindow::new(0.25, 0.75).unwrap();
        let filtered = filter_by_window(ramp(100), window).unwrap();
        assert_eq!(filtered.len(), 51);
        assert_eq!(filtered.values.first(), Some(&25.0));
        assert_eq!(filtered.values.last(), Some(&75.0));
        assert_eq!(filtered.positions[0], [25.0, 0.0, -25.0]);
        assert_eq!(filtered.selection_range, ValueRange::new(0.0, 100.0));
        assert_eq!(filtered.visible_range, ValueRange::new(25.0, 75.0));
    }

    #[test]
    fn reselecting_the_same_window_changes_nothing() {
        let window = FourthDimWindow::new(0.1, 0.6).unwrap();
        let first = filter_by_window(ramp(200), window).unwrap();
        let again = select_within(
            CollapsedPoints { positions: first.positions.clone(), values: first.values.clone() },
            window,
            first.selection_range,
        )
        .unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn survivors_span_the_unit_interval_after_renormalizing() {
        let window = FourthDimWindow::new(0.3, 0.45).unwrap();
        let filtered = filter_by_window(ramp(1000), window).unwrap();
        let normalized: Vec<f32> =
            filtered.values.iter().map(|&v| filtered.visible_range.normalize(v)).collect();
        assert_eq!(normalized.first(), Some(&0.0));
        assert_eq!(normalized.last(), Some(&1.0));

        let refiltered = filter_by_window(
            CollapsedPoints { positions: filtered.positions.clone(), values: filtered.values.clone() },
            FourthDimWindow::FULL,
        )
        .unwrap();
        assert_eq!(refiltered.values, filtered.values);
        assert_eq!(refiltered.visible_range, filtered.visible_range);
    }

    #[test]
    fn empty_input_and_empty_output_are_errors() {
        assert_eq!(
            filter_by_window(CollapsedPoints::default(), FourthDimWindow::FULL).unwrap_err(),
            PipelineError::EmptySet
        );

        let mut sparse = CollapsedPoints::default();
        sparse.push([0.0; 3], 0.0);
        sparse.push([1.0; 3], 1.0);
        let window = FourthDimWindow::new(0.4, 0.6).unwrap();
        assert_eq!(filter_by_window(sparse, window).unwrap_err(), PipelineError::EmptySet);
    }

    #[test]
    fn constant_values_normalize_to_zero() {
        let mut flat = CollapsedPoints::default();
        for i in 0..5 {
            flat.push([i as f32; 3], 2.5);
        }
        let kept = filter_by_window(flat.clone(), FourthDimWindow::FULL).unwrap();
        assert_eq!(kept.len(), 5);
        assert!(kept.visible_range.is_degenerate());

        let window = FourthDimWindow::new(0.5, 1.0).unwrap();
        assert_eq!(filter_by_window(flat, window).unwrap_err(), PipelineError::EmptySet);
    }

    #[test]
    fn malformed_windows_are_rejected() {
        assert!(FourthDimWindow::new(0.6, 0.5).is_err());
        assert!(FourthDimWindow::new(0.5, 0.5).is_err());
        assert!(FourthDimWindow::new(-0.1, 0.5).is_err());
        assert!(FourthDimWindow::new(0.2, 1.1).is_err());
        assert!(FourthDimWindow::new(f32::NAN, 0.5).is_err());
    }

    #[test]
    fn inverse_lerp_clamps_and_reports_degenerate_ranges() {
        let range = ValueRange::new(-2.0, 2.0);
        assert_eq!(range.inverse_lerp(0.0), Ok(0.5));
        assert_eq!(range.inverse_lerp(5.0), Ok(1.0));
        assert_eq!(range.inverse_lerp(-5.0), Ok(0.0));

        let flat = ValueRange::new(3.0, 3.0);
        assert_eq!(
            flat.inverse_lerp(3.0),
            Err(PipelineError::DegenerateRange { min: 3.0, max: 3.0 })
        );
        assert_eq!(flat.normalize(3.0), 0.0);
    }
}
