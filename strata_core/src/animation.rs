// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation records and the queries property-tree construction makes of them.
//!
//! Strata does not produce or tick animations. Hosts attach [`Animation`]
//! records to layers to describe what is currently scheduled, and the
//! builder only asks questions of them: is an opacity or transform
//! animation potentially running, does anything target a property at all,
//! and what scales will a transform animation pass through.

/// The layer property an animation drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetProperty {
    /// The layer's local transform.
    Transform,
    /// The layer's opacity.
    Opacity,
}

/// Where an animation is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Waiting for its target to become available.
    #[default]
    WaitingForTarget,
    /// Scheduled to start on the next tick.
    Starting,
    /// Actively running.
    Running,
    /// Paused; may resume.
    Paused,
    /// Played to completion.
    Finished,
    /// Cancelled before completion.
    Aborted,
}

impl RunState {
    /// Returns `true` if the animation may still affect its target.
    ///
    /// An animation whose end time has passed but which has not yet been
    /// ticked into [`Finished`](Self::Finished) still counts.
    #[inline]
    #[must_use]
    pub const fn is_potentially_running(self) -> bool {
        !matches!(self, Self::Finished | Self::Aborted)
    }
}

/// A single animation attached to a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    /// The animated property.
    pub property: TargetProperty,
    /// Lifecycle state.
    pub run_state: RunState,
    /// Largest scale the animation reaches, if it can be determined.
    pub maximum_target_scale: Option<f32>,
    /// Scale at the first keyframe, if it can be determined.
    pub starting_scale: Option<f32>,
    /// Whether every keyframe is a pure translation.
    pub translation_only: bool,
}

impl Animation {
    /// Creates an opacity animation in the given state.
    #[must_use]
    pub const fn opacity(run_state: RunState) -> Self {
        Self {
            property: TargetProperty::Opacity,
            run_state,
            maximum_target_scale: None,
            starting_scale: None,
            translation_only: true,
        }
    }

    /// Creates a transform animation in the given state.
    ///
    /// Scale information starts unknown and translation-only starts false;
    /// use the `with_*` methods to fill them in.
    #[must_use]
    pub const fn transform(run_state: RunState) -> Self {
        Self {
            property: TargetProperty::Transform,
            run_state,
            maximum_target_scale: None,
            starting_scale: None,
            translation_only: false,
        }
    }

    /// Sets the maximum and starting scales.
    #[must_use]
    pub const fn with_scales(mut self, maximum: f32, starting: f32) -> Self {
        self.maximum_target_scale = Some(maximum);
        self.starting_scale = Some(starting);
        self
    }

    /// Marks the animation as translating only.
    #[must_use]
    pub const fn with_translation_only(mut self) -> Self {
        self.translation_only = true;
        self
    }
}

/// Returns `true` if any animation on `property` may still be running.
#[must_use]
pub fn has_potentially_running(animations: &[Animation], property: TargetProperty) -> bool {
    animations
        .iter()
        .any(|a| a.property == property && a.run_state.is_potentially_running())
}

/// Returns `true` if any animation targets `property`, finished or not.
#[must_use]
pub fn has_any_targeting(animations: &[Animation], property: TargetProperty) -> bool {
    animations.iter().any(|a| a.property == property)
}

/// Largest scale reached by any live transform animation.
///
/// Returns `None` if there is no live transform animation or if any of them
/// cannot report a scale.
#[must_use]
pub fn maximum_target_scale(animations: &[Animation]) -> Option<f32> {
    fold_transform_scales(animations, |a| a.maximum_target_scale)
}

/// Largest starting scale of any live transform animation.
///
/// Same `None` rules as [`maximum_target_scale`].
#[must_use]
pub fn starting_scale(animations: &[Animation]) -> Option<f32> {
    fold_transform_scales(animations, |a| a.starting_scale)
}

/// Returns `true` if every transform animation only translates.
#[must_use]
pub fn has_only_translation_transforms(animations: &[Animation]) -> bool {
    animations
        .iter()
        .filter(|a| a.property == TargetProperty::Transform)
        .all(|a| a.translation_only)
}

fn fold_transform_scales(
    animations: &[Animation],
    scale: impl Fn(&Animation) -> Option<f32>,
) -> Option<f32> {
    let mut result: Option<f32> = None;
    for a in animations.iter().filter(|a| {
        a.property == TargetProperty::Transform && a.run_state.is_potentially_running()
    }) {
        let s = scale(a)?;
        result = Some(result.map_or(s, |r| r.max(s)));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_is_not_running_but_still_targets() {
        let anims = [Animation::transform(RunState::Finished)];
        assert!(!has_potentially_running(&anims, TargetProperty::Transform));
        assert!(has_any_targeting(&anims, TargetProperty::Transform));
        assert!(!has_any_targeting(&anims, TargetProperty::Opacity));
    }

    #[test]
    fn paused_counts_as_running() {
        let anims = [Animation::opacity(RunState::Paused)];
        assert!(has_potentially_running(&anims, TargetProperty::Opacity));
    }

    #[test]
    fn scales_take_the_maximum() {
        let anims = [
            Animation::transform(RunState::Running).with_scales(2.0, 1.0),
            Animation::transform(RunState::Starting).with_scales(3.0, 0.5),
            Animation::opacity(RunState::Running),
        ];
        assert_eq!(maximum_target_scale(&anims), Some(3.0));
        assert_eq!(starting_scale(&anims), Some(1.0));
    }

    #[test]
    fn unknown_scale_poisons_the_result() {
        let anims = [
            Animation::transform(RunState::Running).with_scales(2.0, 1.0),
            Animation::transform(RunState::Running),
        ];
        assert_eq!(maximum_target_scale(&anims), None);
        assert_eq!(maximum_target_scale(&[]), None);
    }

    #[test]
    fn translation_only_requires_all() {
        let mut anims = [
            Animation::transform(RunState::Running).with_translation_only(),
            Animation::transform(RunState::Running).with_translation_only(),
        ];
        assert!(has_only_translation_transforms(&anims));
        anims[1].translation_only = false;
        assert!(!has_only_translation_transforms(&anims));
    }
}
