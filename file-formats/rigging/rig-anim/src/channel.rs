//! Scalar animation channels: tangent resolution, Hermite evaluation and
//! extrapolation outside the key range

use crate::keyframe::{Keyframe, Tangent};
use std::fmt;

/// Behaviour of a channel before its first key or after its last key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extrapolation {
    /// Hold the boundary value
    #[default]
    Constant,
    /// Continue along the boundary tangent
    Linear,
    /// Repeat the key range
    Cycle,
    /// Repeat the key range, accumulating the first-to-last value change
    CycleOffset,
    /// Repeat the key range, alternating forward and backward
    Bounce,
}

impl Extrapolation {
    /// Parse an `.anim` extrapolation keyword
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "constant" => Some(Self::Constant),
            "linear" => Some(Self::Linear),
            "cycle" => Some(Self::Cycle),
            "cycle_offset" => Some(Self::CycleOffset),
            "bounce" => Some(Self::Bounce),
            _ => None,
        }
    }

    /// Keyword as written in `.anim` files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Linear => "linear",
            Self::Cycle => "cycle",
            Self::CycleOffset => "cycle_offset",
            Self::Bounce => "bounce",
        }
    }
}

impl fmt::Display for Extrapolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a query time lands once extrapolation has been resolved
enum Sample {
    /// A fixed value (empty or single-key channel, constant extrapolation)
    Constant(f32),
    /// A point on a boundary tangent line
    Line { value: f32, slope: f32 },
    /// A time inside the key range, plus an additive value offset.
    /// `direction` is -1 when a bounce runs the curve backwards.
    Curve {
        time: f32,
        offset: f32,
        direction: f32,
    },
}

/// One animated scalar (a single DOF) over time
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Channel {
    extrapolate_in: Extrapolation,
    extrapolate_out: Extrapolation,
    keyframes: Vec<Keyframe>,
}

impl Channel {
    /// Build a channel from keys sorted by ascending time and resolve all
    /// tangents.
    ///
    /// Key order is not checked; callers loading untrusted data should make
    /// sure times strictly increase.
    pub fn new(
        keyframes: Vec<Keyframe>,
        extrapolate_in: Extrapolation,
        extrapolate_out: Extrapolation,
    ) -> Self {
        let mut channel = Self {
            extrapolate_in,
            extrapolate_out,
            keyframes,
        };
        channel.precompute();
        channel
    }

    /// Channel holding one value forever
    pub fn constant(value: f32) -> Self {
        Self::new(
            vec![Keyframe::with_rule(0.0, value, Tangent::Flat)],
            Extrapolation::Constant,
            Extrapolation::Constant,
        )
    }

    /// Extrapolation before the first key
    pub fn extrapolate_in(&self) -> Extrapolation {
        self.extrapolate_in
    }

    /// Extrapolation after the last key
    pub fn extrapolate_out(&self) -> Extrapolation {
        self.extrapolate_out
    }

    /// Keys in time order
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Time of the first and last key, if any
    pub fn time_range(&self) -> Option<(f32, f32)> {
        Some((self.keyframes.first()?.time(), self.keyframes.last()?.time()))
    }

    /// Resolve symbolic tangents into slopes, then cache each segment's cubic
    fn precompute(&mut self) {
        let n = self.keyframes.len();
        let slope = |a: &Keyframe, b: &Keyframe| (b.value() - a.value()) / (b.time() - a.time());

        for i in 0..n {
            let prev = i.checked_sub(1).map(|p| &self.keyframes[p]);
            let next = self.keyframes.get(i + 1);
            let key = &self.keyframes[i];

            let slope_in = match key.tangent_in() {
                Tangent::Fixed(value) => value,
                Tangent::Flat => 0.0,
                Tangent::Linear => prev.map_or(0.0, |p| slope(p, key)),
                Tangent::Smooth => match (prev, next) {
                    (Some(p), Some(n)) => slope(p, n),
                    (Some(p), None) => slope(p, key),
                    _ => 0.0,
                },
            };

            let slope_out = match key.tangent_out() {
                Tangent::Fixed(value) => value,
                Tangent::Flat => 0.0,
                Tangent::Linear => next.map_or(0.0, |n| slope(key, n)),
                Tangent::Smooth => match (prev, next) {
                    (Some(p), Some(n)) => slope(p, n),
                    (None, Some(n)) => slope(key, n),
                    _ => 0.0,
                },
            };

            let key = &mut self.keyframes[i];
            key.slope_in = slope_in;
            key.slope_out = slope_out;
        }

        for i in 0..n {
            let coefficients = match self.keyframes.get(i + 1) {
                Some(k1) => {
                    let k0 = &self.keyframes[i];
                    let dt = k1.time() - k0.time();
                    let (v0, v1) = (k0.value(), k1.value());
                    let (m0, m1) = (k0.slope_out * dt, k1.slope_in * dt);
                    [
                        2.0 * v0 - 2.0 * v1 + m0 + m1,
                        -3.0 * v0 + 3.0 * v1 - 2.0 * m0 - m1,
                        m0,
                        v0,
                    ]
                }
                None => [0.0, 0.0, 0.0, self.keyframes[i].value()],
            };
            self.keyframes[i].coefficients = coefficients;
        }
    }

    /// Value of the channel at `time`
    pub fn evaluate(&self, time: f32) -> f32 {
        match self.locate(time) {
            Sample::Constant(value) | Sample::Line { value, .. } => value,
            Sample::Curve { time, offset, .. } => self.segment_value(time) + offset,
        }
    }

    /// First derivative of the channel at `time` (value per second)
    pub fn evaluate_slope(&self, time: f32) -> f32 {
        match self.locate(time) {
            Sample::Constant(_) => 0.0,
            Sample::Line { slope, .. } => slope,
            Sample::Curve {
                time, direction, ..
            } => direction * self.segment_slope(time),
        }
    }

    /// Reduce an arbitrary time to a constant, a tangent line or a time inside
    /// the key range. Cycling modes wrap in closed form.
    fn locate(&self, t: f32) -> Sample {
        let (first, last) = match self.keyframes.as_slice() {
            [] => return Sample::Constant(0.0),
            [only] => return Sample::Constant(only.value()),
            [first, .., last] => (first, last),
        };

        let (mode, boundary, slope) = if t < first.time() {
            (self.extrapolate_in, first, first.slope_in)
        } else if t > last.time() {
            (self.extrapolate_out, last, last.slope_out)
        } else {
            return Sample::Curve {
                time: t,
                offset: 0.0,
                direction: 1.0,
            };
        };

        let duration = last.time() - first.time();
        let cycles = ((t - first.time()) / duration).floor();
        let wrapped = t - first.time() - cycles * duration;

        match mode {
            Extrapolation::Constant => Sample::Constant(boundary.value()),
            Extrapolation::Linear => Sample::Line {
                value: boundary.value() + slope * (t - boundary.time()),
                slope,
            },
            // Coincident first and last keys leave nothing to repeat
            _ if duration <= 0.0 => Sample::Constant(boundary.value()),
            Extrapolation::Cycle => Sample::Curve {
                time: first.time() + wrapped,
                offset: 0.0,
                direction: 1.0,
            },
            Extrapolation::CycleOffset => Sample::Curve {
                time: first.time() + wrapped,
                offset: cycles * (last.value() - first.value()),
                direction: 1.0,
            },
            Extrapolation::Bounce => {
                if (cycles as i64) % 2 != 0 {
                    Sample::Curve {
                        time: last.time() - wrapped,
                        offset: 0.0,
                        direction: -1.0,
                    }
                } else {
                    Sample::Curve {
                        time: first.time() + wrapped,
                        offset: 0.0,
                        direction: 1.0,
                    }
                }
            }
        }
    }

    /// Index of the segment `[keys[i], keys[i + 1]]` holding `t`; ties at a
    /// shared key favour the earlier segment
    fn segment_index(&self, t: f32) -> usize {
        let last_segment = self.keyframes.len() - 2;
        self.keyframes[1..]
            .partition_point(|key| key.time() < t)
            .min(last_segment)
    }

    /// Segment index and normalised parameter for an in-range time
    fn segment_at(&self, t: f32) -> (usize, f32) {
        let (first, last) = (self.keyframes[0].time(), self.keyframes[self.keyframes.len() - 1].time());
        let t = t.max(first).min(last);
        let i = self.segment_index(t);
        let (t0, t1) = (self.keyframes[i].time(), self.keyframes[i + 1].time());
        (i, (t - t0) / (t1 - t0))
    }

    /// Cubic Hermite value on a segment, using the basis form so the keys
    /// themselves are hit exactly
    fn segment_value(&self, t: f32) -> f32 {
        let (i, u) = self.segment_at(t);
        let (k0, k1) = (&self.keyframes[i], &self.keyframes[i + 1]);
        let dt = k1.time() - k0.time();
        let m0 = k0.slope_out * dt;
        let m1 = k1.slope_in * dt;

        let u2 = u * u;
        let u3 = u2 * u;
        let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
        let h10 = u3 - 2.0 * u2 + u;
        let h01 = -2.0 * u3 + 3.0 * u2;
        let h11 = u3 - u2;

        h00 * k0.value() + h10 * m0 + h01 * k1.value() + h11 * m1
    }

    /// Derivative of the cached cubic, rescaled from `u` to seconds
    fn segment_slope(&self, t: f32) -> f32 {
        let (i, u) = self.segment_at(t);
        let dt = self.keyframes[i + 1].time() - self.keyframes[i].time();
        let [a, b, c, _] = self.keyframes[i].coefficients;
        (3.0 * a * u * u + 2.0 * b * u + c) / dt
    }
}
