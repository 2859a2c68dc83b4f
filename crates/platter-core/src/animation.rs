//! Animation curves shared by the transition engine and the rotation control
//!
//! Two curve families are provided:
//! - [`Spring`]: a damped harmonic oscillator parameterised by response
//!   (period of the undamped oscillation, in seconds) and damping fraction.
//!   It overshoots slightly when underdamped and is time-boxed by its
//!   settling time.
//! - [`Easing`]: fixed-duration timing curves used with [`Tween`].

use serde::{Deserialize, Serialize};

/// Residual amplitude below which a spring counts as settled
const SETTLE_THRESHOLD: f32 = 0.001;

/// Upper bound for any spring animation, in seconds
const MAX_SETTLE_SECS: f32 = 3.0;

/// Spring timing curve from 0 to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    /// Seconds for one undamped oscillation
    pub response: f32,
    /// 0 = no damping, 1 = critically damped
    pub damping_fraction: f32,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            response: 0.5,
            damping_fraction: 0.7,
        }
    }
}

impl Spring {
    pub fn new(response: f32, damping_fraction: f32) -> Self {
        Self {
            response: response.max(0.01),
            damping_fraction: damping_fraction.clamp(0.0, 1.0),
        }
    }

    /// Undamped angular frequency
    fn omega(&self) -> f32 {
        std::f32::consts::TAU / self.response.max(0.01)
    }

    fn zeta(&self) -> f32 {
        self.damping_fraction.clamp(0.0, 1.0)
    }

    /// Curve value at `t` seconds; starts at 0, settles at 1, may overshoot
    pub fn value(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= self.settling_duration() {
            return 1.0;
        }
        let omega = self.omega();
        let zeta = self.zeta();
        if zeta >= 1.0 {
            // Critically damped
            let decay = (-omega * t).exp();
            return 1.0 - decay * (1.0 + omega * t);
        }
        let damped = omega * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * omega * t).exp();
        1.0 - decay * ((damped * t).cos() + (zeta * omega / damped) * (damped * t).sin())
    }

    /// Time after which the residual oscillation is below the settle threshold
    pub fn settling_duration(&self) -> f32 {
        let omega = self.omega();
        let zeta = self.zeta();
        if zeta <= 0.0 {
            return MAX_SETTLE_SECS;
        }
        let amplitude = if zeta >= 1.0 {
            // (1 + wt) grows slowly; a factor of 10 covers the tail
            10.0
        } else {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            1.0 + zeta * omega / damped
        };
        let t = (amplitude / SETTLE_THRESHOLD).ln() / (zeta * omega);
        t.min(MAX_SETTLE_SECS)
    }
}

/// Fixed-duration easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Cubic bezier (0.42, 0, 0.58, 1)
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map linear progress in [0, 1] to eased progress
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
        }
    }
}

/// Evaluate a CSS-style cubic bezier timing function at `x`
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    let bezier = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };
    let slope = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * a + 6.0 * inv * s * (b - a) + 3.0 * s * s * (1.0 - b)
    };

    // Newton iterations on the x curve, bisection fallback for flat slopes
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(x1, x2, s) - x;
        if err.abs() < 1e-6 {
            return bezier(y1, y2, s);
        }
        let d = slope(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let value = bezier(x1, x2, s);
        if (value - x).abs() < 1e-6 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    bezier(y1, y2, s)
}

/// Description of a timed animation to apply to a value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedAnimation {
    pub duration_secs: f32,
    pub easing: Easing,
}

/// A scalar animating from one value to another over a fixed duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    animation: TimedAnimation,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, animation: TimedAnimation) -> Self {
        Self {
            from,
            to,
            animation,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds and return the new value
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.max(0.0);
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let progress = self.elapsed / self.animation.duration_secs;
        let eased = self.animation.easing.apply(progress);
        self.from + (self.to - self.from) * eased
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.animation.duration_secs <= 0.0 || self.elapsed >= self.animation.duration_secs
    }
}
