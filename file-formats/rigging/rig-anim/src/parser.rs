//! `.anim` text parser
//!
//! ```text
//! animation {
//!     range 0 2
//!     numchannels 6
//!     channel {
//!         extrapolate constant cycle
//!         keys 2 {
//!             0.0 0.0 flat flat
//!             2.0 1.5 linear 0.25
//!         }
//!     }
//!     ...
//! }
//! ```

use crate::animation::Animation;
use crate::channel::{Channel, Extrapolation};
use crate::error::{AnimError, Result};
use crate::keyframe::{Keyframe, Tangent};
use rig_utils::Tokenizer;

/// Parse a complete animation
pub fn parse_animation(text: &str) -> Result<Animation> {
    let mut tokenizer = Tokenizer::new(text);

    let header = tokenizer.next_token().unwrap_or_default();
    if header != "animation" {
        return Err(AnimError::MissingHeader {
            found: header.to_string(),
        });
    }
    tokenizer.skip_to("{")?;

    let mut start = 0.0;
    let mut end = 0.0;
    let mut declared = None;
    let mut channels = Vec::new();

    loop {
        match tokenizer.token()? {
            "}" => break,
            "range" => {
                start = tokenizer.read_f32()?;
                end = tokenizer.read_f32()?;
            }
            "numchannels" => {
                declared = Some(tokenizer.read_usize()?);
            }
            "channel" => channels.push(parse_channel(&mut tokenizer, channels.len())?),
            other => {
                log::warn!(
                    "Unknown token '{}' in animation at line {}",
                    other,
                    tokenizer.line()
                );
            }
        }
    }

    if let Some(declared) = declared.filter(|&n| n != channels.len()) {
        log::warn!(
            "Animation declares {} channels but contains {}",
            declared,
            channels.len()
        );
    }

    log::debug!(
        "Parsed animation [{}, {}] with {} channels",
        start,
        end,
        channels.len()
    );
    Ok(Animation::new(start, end, channels))
}

fn read_extrapolation(tokenizer: &mut Tokenizer<'_>) -> Result<Extrapolation> {
    let token = tokenizer.token()?;
    Ok(Extrapolation::from_token(token).unwrap_or_else(|| {
        log::warn!(
            "Unknown extrapolation mode '{}' at line {}, using constant",
            token,
            tokenizer.line()
        );
        Extrapolation::Constant
    }))
}

fn read_tangent(tokenizer: &mut Tokenizer<'_>) -> Result<Tangent> {
    let token = tokenizer.token()?;
    Ok(Tangent::from_token(token).unwrap_or_else(|| {
        log::warn!(
            "Unknown tangent rule '{}' at line {}, using flat",
            token,
            tokenizer.line()
        );
        Tangent::Flat
    }))
}

/// Parse `{ extrapolate .. keys .. }`; the `channel` keyword is consumed.
///
/// The channel's tangents are resolved only after every key is read.
fn parse_channel(tokenizer: &mut Tokenizer<'_>, index: usize) -> Result<Channel> {
    tokenizer.skip_to("{")?;

    let mut extrapolate_in = Extrapolation::Constant;
    let mut extrapolate_out = Extrapolation::Constant;
    let mut keyframes = Vec::new();

    loop {
        match tokenizer.token()? {
            "}" => break,
            "extrapolate" => {
                extrapolate_in = read_extrapolation(tokenizer)?;
                extrapolate_out = read_extrapolation(tokenizer)?;
            }
            "keys" => {
                let count = tokenizer.read_usize()?;
                tokenizer.skip_to("{")?;
                keyframes = Vec::new();
                for _ in 0..count {
                    let time = tokenizer.read_f32()?;
                    let value = tokenizer.read_f32()?;
                    let tangent_in = read_tangent(tokenizer)?;
                    let tangent_out = read_tangent(tokenizer)?;
                    keyframes.push(Keyframe::new(time, value, tangent_in, tangent_out));
                }
                tokenizer.skip_to("}")?;
            }
            other => {
                log::warn!(
                    "Unknown token '{}' in channel {} at line {}",
                    other,
                    index,
                    tokenizer.line()
                );
            }
        }
    }

    if keyframes.windows(2).any(|pair| pair[1].time() <= pair[0].time()) {
        log::warn!("Channel {} has key times that do not strictly increase", index);
    }

    Ok(Channel::new(keyframes, extrapolate_in, extrapolate_out))
}
