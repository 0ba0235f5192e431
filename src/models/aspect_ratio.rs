use crate::error::{AssistantError, Result};
use std::fmt;
use std::str::FromStr;

/// Screen aspect ratio reduced to its lowest terms.
///
/// `16:10` and `8:5` describe the same ratio and compare equal. Only zero
/// components are rejected; negative values are kept as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    x: i64,
    y: i64,
}

impl AspectRatio {
    /// Create a ratio from width and height parts, reducing by their GCD.
    ///
    /// # Errors
    /// Returns [`AssistantError::InvalidAspectRatio`] if either part is zero.
    pub fn new(x: i64, y: i64) -> Result<Self> {
        if x == 0 || y == 0 {
            return Err(AssistantError::InvalidAspectRatio { x, y });
        }

        let divisor = gcd(x, y);
        Ok(Self {
            x: x / divisor,
            y: y / divisor,
        })
    }

    pub fn x(&self) -> i64 {
        self.x
    }

    pub fn y(&self) -> i64 {
        self.y
    }

    /// Build a ratio from an optional `"<x>:<y>"` string.
    ///
    /// Malformed strings are logged and yield `None`, which callers treat as
    /// "no aspect ratio requirement".
    pub fn from_string(ratio_str: Option<&str>) -> Option<Self> {
        let ratio_str = ratio_str?;
        match ratio_str.parse() {
            Ok(ratio) => Some(ratio),
            Err(e) => {
                tracing::error!("Invalid aspect ratio {:?}: {}. Use '<x>:<y>' format.", ratio_str, e);
                None
            }
        }
    }

    /// Check whether `ratio_str` describes the same ratio once reduced.
    ///
    /// Input that cannot be parsed never matches.
    pub fn is_equal(&self, ratio_str: &str) -> bool {
        let Some((x, y)) = split_ratio(ratio_str) else {
            tracing::warn!(
                "Cannot compare with aspect ratio {:?}. Use '<x>:<y>' format.",
                ratio_str
            );
            return false;
        };

        let divisor = gcd(x, y);
        if divisor == 0 {
            return false;
        }

        self.x == x / divisor && self.y == y / divisor
    }
}

impl FromStr for AspectRatio {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = split_ratio(s).ok_or_else(|| AssistantError::Parse {
            field: "AspectRatio",
            value: s.to_string(),
        })?;
        Self::new(x, y)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}

/// Reduce a pixel resolution to the ratio string reported for the screen.
///
/// A reduced height of 5 is doubled, so 1920x1200 reports as `16:10`
/// rather than `8:5`. Returns an empty string for a zero-sized screen.
pub fn screen_ratio(width: u32, height: u32) -> String {
    let divisor = gcd(i64::from(width), i64::from(height));
    if divisor == 0 {
        return String::new();
    }

    let mut x = i64::from(width) / divisor;
    let mut y = i64::from(height) / divisor;
    if y == 5 {
        x *= 2;
        y *= 2;
    }
    format!("{}:{}", x, y)
}

/// Split `"<x>:<y>"` into exactly two integers.
fn split_ratio(s: &str) -> Option<(i64, i64)> {
    let mut parts = s.split(':');
    let x = parts.next()?.trim().parse().ok()?;
    let y = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((x, y))
}

/// Non-negative greatest common divisor; `gcd(0, 0) == 0`.
fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a as i64
}
