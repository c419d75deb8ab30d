//! Keyframes and tangent rules

/// How a keyframe's in or out tangent is obtained
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tangent {
    /// Explicit slope (value per second), never recomputed
    Fixed(f32),
    /// Zero slope
    Flat,
    /// Slope towards the neighbouring key on the tangent's side
    Linear,
    /// Slope between the previous and next keys
    Smooth,
}

impl Tangent {
    /// Parse a tangent token: a finite number is [`Tangent::Fixed`], otherwise
    /// one of `flat`, `linear` or `smooth`
    pub fn from_token(token: &str) -> Option<Self> {
        if let Some(slope) = token.parse::<f32>().ok().filter(|s| s.is_finite()) {
            return Some(Self::Fixed(slope));
        }
        match token {
            "flat" => Some(Self::Flat),
            "linear" => Some(Self::Linear),
            "smooth" => Some(Self::Smooth),
            _ => None,
        }
    }

    /// Rule name as written in `.anim` files (`fixed` for numeric tangents)
    pub fn rule_name(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "fixed",
            Self::Flat => "flat",
            Self::Linear => "linear",
            Self::Smooth => "smooth",
        }
    }
}

/// A single (time, value) sample of a channel with its tangents
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Keyframe {
    time: f32,
    value: f32,
    tangent_in: Tangent,
    tangent_out: Tangent,
    pub(crate) slope_in: f32,
    pub(crate) slope_out: f32,
    /// `[a, b, c, d]` of `a·u³ + b·u² + c·u + d` for the segment starting here
    pub(crate) coefficients: [f32; 4],
}

impl Keyframe {
    /// Create a keyframe; slopes are resolved when it is placed in a channel
    pub fn new(time: f32, value: f32, tangent_in: Tangent, tangent_out: Tangent) -> Self {
        let fixed = |tangent: Tangent| match tangent {
            Tangent::Fixed(slope) => slope,
            _ => 0.0,
        };
        Self {
            time,
            value,
            tangent_in,
            tangent_out,
            slope_in: fixed(tangent_in),
            slope_out: fixed(tangent_out),
            coefficients: [0.0, 0.0, 0.0, value],
        }
    }

    /// Keyframe with the same rule on both sides
    pub fn with_rule(time: f32, value: f32, tangent: Tangent) -> Self {
        Self::new(time, value, tangent, tangent)
    }

    /// Key time (seconds)
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Key value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Authored in-tangent rule
    pub fn tangent_in(&self) -> Tangent {
        self.tangent_in
    }

    /// Authored out-tangent rule
    pub fn tangent_out(&self) -> Tangent {
        self.tangent_out
    }

    /// Resolved incoming slope (value per second)
    pub fn slope_in(&self) -> f32 {
        self.slope_in
    }

    /// Resolved outgoing slope (value per second)
    pub fn slope_out(&self) -> f32 {
        self.slope_out
    }

    /// Cached cubic `[a, b, c, d]` for the segment that starts at this key,
    /// in the normalised segment parameter `u`
    pub fn coefficients(&self) -> [f32; 4] {
        self.coefficients
    }
}
