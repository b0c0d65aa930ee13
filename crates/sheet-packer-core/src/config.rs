use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetPackerError};

/// Smallest allowed sheet dimension.
pub const MIN_DIMENSION: u32 = 1;
/// Largest allowed sheet dimension.
pub const MAX_DIMENSION: u32 = 8192;

/// Sheet constraints.
/// Key notes:
///   - `max_width`/`max_height` bound the final sheet size (both within `1..=8192`)
///   - `power_of_two` requires both maxima to be powers of two and keeps the sheet at power-of-two sizes
///   - `maintain_aspect_ratio` keeps the sheet at `max_width / max_height`
///
/// Every constructor and setter validates; an invalid change returns an error and leaves the
/// value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConstraintsRecord")]
pub struct Constraints {
    max_width: u32,
    max_height: u32,
    power_of_two: bool,
    maintain_aspect_ratio: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            power_of_two: false,
            maintain_aspect_ratio: false,
        }
    }
}

impl Constraints {
    pub fn new(
        max_width: u32,
        max_height: u32,
        power_of_two: bool,
        maintain_aspect_ratio: bool,
    ) -> Result<Self> {
        validate(max_width, max_height, power_of_two)?;
        Ok(Self {
            max_width,
            max_height,
            power_of_two,
            maintain_aspect_ratio,
        })
    }

    /// Create a fluent builder for `Constraints`.
    pub fn builder() -> ConstraintsBuilder {
        ConstraintsBuilder::new()
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }
    pub fn max_height(&self) -> u32 {
        self.max_height
    }
    pub fn max_size(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }
    pub fn power_of_two(&self) -> bool {
        self.power_of_two
    }
    pub fn maintain_aspect_ratio(&self) -> bool {
        self.maintain_aspect_ratio
    }

    /// `max_width / max_height`. Only meaningful when `maintain_aspect_ratio` is set.
    pub fn aspect_ratio(&self) -> f64 {
        self.max_width as f64 / self.max_height as f64
    }

    pub fn set_max_size(&mut self, max_width: u32, max_height: u32) -> Result<()> {
        validate(max_width, max_height, self.power_of_two)?;
        self.max_width = max_width;
        self.max_height = max_height;
        Ok(())
    }
    pub fn set_max_width(&mut self, max_width: u32) -> Result<()> {
        self.set_max_size(max_width, self.max_height)
    }
    pub fn set_max_height(&mut self, max_height: u32) -> Result<()> {
        self.set_max_size(self.max_width, max_height)
    }
    pub fn set_power_of_two(&mut self, power_of_two: bool) -> Result<()> {
        validate(self.max_width, self.max_height, power_of_two)?;
        self.power_of_two = power_of_two;
        Ok(())
    }
    pub fn set_maintain_aspect_ratio(&mut self, maintain_aspect_ratio: bool) {
        self.maintain_aspect_ratio = maintain_aspect_ratio;
    }

    /// Height that keeps `width` at the configured aspect ratio, rounded up.
    pub fn height_for_width(&self, width: u32) -> u32 {
        ceil_ratio(width, self.max_height, self.max_width)
    }

    /// Width that keeps `height` at the configured aspect ratio, rounded up.
    pub fn width_for_height(&self, height: u32) -> u32 {
        ceil_ratio(height, self.max_width, self.max_height)
    }
}

fn ceil_ratio(value: u32, num: u32, den: u32) -> u32 {
    let den = den.max(1) as u64;
    let scaled = (value as u64 * num as u64).div_ceil(den);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

fn validate(max_width: u32, max_height: u32, power_of_two: bool) -> Result<()> {
    let range = MIN_DIMENSION..=MAX_DIMENSION;
    if !range.contains(&max_width) || !range.contains(&max_height) {
        return Err(SheetPackerError::InvalidDimensions {
            width: max_width,
            height: max_height,
        });
    }
    if power_of_two && !(is_power_of_two(max_width) && is_power_of_two(max_height)) {
        return Err(SheetPackerError::InvalidConfig(format!(
            "power_of_two requires power-of-two maximum dimensions, got {}x{}",
            max_width, max_height
        )));
    }
    Ok(())
}

/// True for strictly positive powers of two.
pub fn is_power_of_two(n: u32) -> bool {
    n > 0 && n & n.wrapping_neg() == n
}

/// The power of two just above the highest set bit of `n` (`6 -> 8`, `8 -> 16`, `0 -> 1`).
/// Saturates at `u32::MAX` when the result does not fit.
pub fn next_power_of_two(n: u32) -> u32 {
    1u32.checked_shl(u32::BITS - n.leading_zeros())
        .unwrap_or(u32::MAX)
}

/// Smallest power of two that is `>= n` (`n` itself when it already is one).
pub fn round_up_power_of_two(n: u32) -> u32 {
    if is_power_of_two(n) {
        n
    } else {
        next_power_of_two(n)
    }
}

fn default_max_dimension() -> u32 {
    MAX_DIMENSION
}

/// Serialized form of `Constraints`; converted through the same validation as `Constraints::new`.
#[derive(Debug, Clone, Deserialize)]
struct ConstraintsRecord {
    #[serde(default = "default_max_dimension")]
    max_width: u32,
    #[serde(default = "default_max_dimension")]
    max_height: u32,
    #[serde(default)]
    power_of_two: bool,
    #[serde(default)]
    maintain_aspect_ratio: bool,
}

impl TryFrom<ConstraintsRecord> for Constraints {
    type Error = SheetPackerError;

    fn try_from(r: ConstraintsRecord) -> Result<Self> {
        Constraints::new(
            r.max_width,
            r.max_height,
            r.power_of_two,
            r.maintain_aspect_ratio,
        )
    }
}

/// Builder for `Constraints`; validation happens once in `build`.
#[derive(Debug, Clone)]
pub struct ConstraintsBuilder {
    max_width: u32,
    max_height: u32,
    power_of_two: bool,
    maintain_aspect_ratio: bool,
}

impl Default for ConstraintsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintsBuilder {
    pub fn new() -> Self {
        let c = Constraints::default();
        Self {
            max_width: c.max_width,
            max_height: c.max_height,
            power_of_two: c.power_of_two,
            maintain_aspect_ratio: c.maintain_aspect_ratio,
        }
    }
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.max_width = w;
        self.max_height = h;
        self
    }
    pub fn pow2(mut self, v: bool) -> Self {
        self.power_of_two = v;
        self
    }
    pub fn keep_aspect(mut self, v: bool) -> Self {
        self.maintain_aspect_ratio = v;
        self
    }
    pub fn build(self) -> Result<Constraints> {
        Constraints::new(
            self.max_width,
            self.max_height,
            self.power_of_two,
            self.maintain_aspect_ratio,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_helpers() {
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(8192));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(6));
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(6), 8);
        assert_eq!(next_power_of_two(8), 16);
        assert_eq!(next_power_of_two(u32::MAX), u32::MAX);
        assert_eq!(round_up_power_of_two(8), 8);
        assert_eq!(round_up_power_of_two(9), 16);
    }

    #[test]
    fn ratio_helpers_round_up() {
        let c = Constraints::new(16, 32, false, true).unwrap();
        assert_eq!(c.height_for_width(8), 16);
        assert_eq!(c.width_for_height(7), 4);
        let c = Constraints::new(300, 200, false, true).unwrap();
        assert_eq!(c.height_for_width(10), 7);
        assert_eq!(c.width_for_height(10), 15);
        assert_eq!(c.height_for_width(0), 0);
    }
}
