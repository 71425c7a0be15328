//! Touchdown classification.
//!
//! When a footpad first contacts terrain, the episode snapshots the lander's
//! kinematics and runs them through the limits below. The thresholds follow
//! the Apollo LM touchdown envelope: a vertical-rate ceiling, a horizontal
//! ceiling that tapers as descent rate grows, and a tilt limit.

use glam::Vec2;
use physics::TerrainContact;

/// How a touchdown resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingOutcome {
    Safe,
    Crash,
}

/// Snapshot of the lander taken at first footpad contact.
#[derive(Debug, Clone, Copy)]
pub struct LanderKinematics {
    /// World-space velocity.
    pub velocity: Vec2,
    /// Body angle in radians, zero when upright.
    pub angle: f32,
    /// World x of the left footpad.
    pub footprint_left_x: f32,
    /// World x of the right footpad.
    pub footprint_right_x: f32,
}

/// Touchdown limits. Defaults reproduce the Apollo LM envelope.
#[derive(Debug, Clone, Copy)]
pub struct LandingLimits {
    /// Absolute ceiling on vertical speed, m/s.
    pub max_vertical: f32,
    /// Ceiling on horizontal speed at low vertical speeds, m/s.
    pub max_horizontal: f32,
    /// Vertical speed above which the horizontal allowance starts shrinking.
    pub taper_knee: f32,
    /// How fast the horizontal allowance shrinks past the knee.
    pub taper_slope: f32,
    /// Tilt limit in degrees, either direction.
    pub max_tilt_deg: f32,
}

impl Default for LandingLimits {
    fn default() -> Self {
        Self {
            max_vertical: 3.05,
            max_horizontal: 1.22,
            taper_knee: 2.13,
            taper_slope: 4.0 / 3.0,
            max_tilt_deg: 12.0,
        }
    }
}

impl LandingLimits {
    /// Horizontal speed allowance at the given vertical speed. Full
    /// allowance up to the knee, then a linear taper that reaches zero at
    /// `max_vertical`.
    pub fn max_horizontal_at(&self, vertical_speed: f32) -> f32 {
        if vertical_speed <= self.taper_knee {
            self.max_horizontal
        } else {
            self.taper_slope * (self.max_vertical - vertical_speed)
        }
    }
}

/// Classify a touchdown. Pure: same inputs always give the same outcome.
pub fn evaluate(
    limits: &LandingLimits,
    kinematics: &LanderKinematics,
    contact: &TerrainContact,
) -> LandingOutcome {
    // Vertical speed is the magnitude; contact at speed is no safer going
    // up than coming down.
    let vertical_speed = kinematics.velocity.y.abs();
    let horizontal_speed = kinematics.velocity.x.abs();

    if vertical_speed > limits.max_vertical {
        log::debug!("crash: vertical speed {vertical_speed:.2} over limit");
        return LandingOutcome::Crash;
    }
    if horizontal_speed > limits.max_horizontal {
        log::debug!("crash: horizontal speed {horizontal_speed:.2} over limit");
        return LandingOutcome::Crash;
    }
    if horizontal_speed > limits.max_horizontal_at(vertical_speed) {
        log::debug!(
            "crash: horizontal speed {horizontal_speed:.2} over tapered limit at vertical {vertical_speed:.2}"
        );
        return LandingOutcome::Crash;
    }

    let tilt_deg = kinematics.angle.to_degrees().abs();
    if tilt_deg > limits.max_tilt_deg {
        log::debug!("crash: tilt {tilt_deg:.1} deg over limit");
        return LandingOutcome::Crash;
    }

    if !contact.is_pad {
        log::debug!("crash: touchdown on rough terrain");
        return LandingOutcome::Crash;
    }
    if kinematics.footprint_left_x < contact.min_x || kinematics.footprint_right_x > contact.max_x {
        log::debug!(
            "crash: footprint [{:.1}, {:.1}] overhangs pad [{:.1}, {:.1}]",
            kinematics.footprint_left_x,
            kinematics.footprint_right_x,
            contact.min_x,
            contact.max_x
        );
        return LandingOutcome::Crash;
    }

    LandingOutcome::Safe
}
