use super::{AcquisitionTarget, AttitudeState, TimingProfile};
use crate::geometry::{GeometryContext, truncate_to_ms};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use strum_macros::Display;

/// Why a target cannot be captured right now.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum InfeasibleReason {
    /// Reorientation plus margin ends after the target's deadline.
    RotationExceedsDeadline,
    /// The spacecraft is not above the target's local horizon.
    BelowHorizon,
    /// The target does not describe a place on Earth.
    InvalidTarget,
}

impl InfeasibleReason {
    /// Returns `true` if re-evaluating later cannot change the verdict.
    pub fn is_permanent(self) -> bool { matches!(self, InfeasibleReason::InvalidTarget) }
}

/// Outcome of a single feasibility evaluation.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FeasibilityResult {
    Feasible {
        /// Earliest time the camera can fire.
        execute_at: DateTime<Utc>,
        /// Angle the boresight has to travel, `0` for the immediate-capture sentinel.
        slew_deg: Option<f64>,
    },
    Infeasible(InfeasibleReason),
}

impl FeasibilityResult {
    pub fn is_feasible(&self) -> bool { matches!(self, FeasibilityResult::Feasible { .. }) }
}

/// Decides whether and by when a reorientation plus capture can complete.
///
/// The worst-case rotation of the [`TimingProfile`] is the upper bound for every maneuver.
/// It is fixed at construction and never scaled down by the actual slew angle, so a schedule
/// computed here holds for any attitude the spacecraft might be in.
#[derive(Clone)]
pub struct FeasibilityEvaluator {
    profile: TimingProfile,
    geometry: Arc<GeometryContext>,
    /// Minimum elevation above the target's horizon, degrees.
    elevation_mask_deg: f64,
}

impl FeasibilityEvaluator {
    pub fn new(profile: TimingProfile, geometry: Arc<GeometryContext>, elevation_mask_deg: f64) -> Self {
        Self { profile, geometry, elevation_mask_deg }
    }

    pub fn profile(&self) -> &TimingProfile { &self.profile }

    /// Evaluates `target` against the attitude sample `attitude` at clock sample `now`.
    ///
    /// Pure function of its inputs and the fixed profile.
    pub fn evaluate(&self, target: &AcquisitionTarget, attitude: &AttitudeState, now: DateTime<Utc>) -> FeasibilityResult {
        let now = truncate_to_ms(now).unwrap_or(now);
        match target {
            AcquisitionTarget::CurrentPosition => match now.checked_add_signed(self.profile.safety_margin()) {
                Some(execute_at) => FeasibilityResult::Feasible { execute_at, slew_deg: Some(0.0) },
                None => FeasibilityResult::Infeasible(InfeasibleReason::InvalidTarget),
            },
            AcquisitionTarget::Location { point, deadline } => {
                if !point.is_valid() {
                    return FeasibilityResult::Infeasible(InfeasibleReason::InvalidTarget);
                }
                let ellipsoid = self.geometry.ellipsoid();
                if !ellipsoid.is_visible(point, &attitude.position(), self.elevation_mask_deg) {
                    return FeasibilityResult::Infeasible(InfeasibleReason::BelowHorizon);
                }
                // A schedule past the representable time range can never be met.
                let Some(execute_at) = now.checked_add_signed(self.profile.maneuver_lead()) else {
                    return FeasibilityResult::Infeasible(InfeasibleReason::InvalidTarget);
                };
                if deadline.is_some_and(|d| execute_at > d) {
                    return FeasibilityResult::Infeasible(InfeasibleReason::RotationExceedsDeadline);
                }
                let slew_deg = attitude.slew_angle_deg(&ellipsoid.to_cartesian(point));
                FeasibilityResult::Feasible { execute_at, slew_deg }
            }
        }
    }
}
