//! Timecode algebra with pulldown-aware framerates
//!
//! A [`Timecode`] is an absolute frame index counted at a nominal framerate.
//! Pulldown rates (23.98, 29.97, 59.94) count and display frames at their
//! integer neighbour (24, 30, 60) but elapse real time at the fractional
//! rate. Frame arithmetic always uses the integer fps; only the
//! `real_seconds*` conversions use the fractional rate.
//!
//! Timecodes at different nominal rates never mix: arithmetic and comparison
//! across rates fail with [`TurnoverError::FramerateMismatch`] instead of
//! coercing.

use crate::types::{Result, TurnoverError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Nominal framerates understood by the turnover pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FrameRate {
    /// 23.976 fps (24000/1001, NTSC film pulldown)
    Fps23_98,
    /// 24 fps (film)
    Fps24,
    /// 25 fps (PAL)
    Fps25,
    /// 29.97 fps (30000/1001, NTSC)
    Fps29_97,
    /// 30 fps
    Fps30,
    /// 59.94 fps (60000/1001)
    Fps59_94,
}

impl FrameRate {
    /// Every supported rate, slowest first
    pub const ALL: [FrameRate; 6] = [
        FrameRate::Fps23_98,
        FrameRate::Fps24,
        FrameRate::Fps25,
        FrameRate::Fps29_97,
        FrameRate::Fps30,
        FrameRate::Fps59_94,
    ];

    /// Map any known spelling of a framerate to its canonical variant
    ///
    /// Accepts decimal spellings (`23.976`, `23.98`, `24.0`), rational
    /// spellings (`24000/1001`) and the usual names (`film`, `pal`, `ntsc`,
    /// `ntsc-film`, `30i`, `60i`). Matching is case-insensitive.
    pub fn normalize(raw: &str) -> Result<FrameRate> {
        let key = raw.trim().to_ascii_lowercase();
        let key = match key.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 => format!("{}", v as i64),
            _ => key,
        };

        match key.as_str() {
            "23.976" | "23.98" | "ntsc-film" | "24000/1001" | "2400/1001" => Ok(FrameRate::Fps23_98),
            "24" | "film" => Ok(FrameRate::Fps24),
            "25" | "pal" => Ok(FrameRate::Fps25),
            "29.97" | "ntsc" | "30000/1001" | "3000/1001" | "30i" => Ok(FrameRate::Fps29_97),
            "30" => Ok(FrameRate::Fps30),
            "59.94" | "60i" | "60000/1001" => Ok(FrameRate::Fps59_94),
            _ => Err(TurnoverError::UnknownFramerate(raw.trim().to_string())),
        }
    }

    /// Normalize a numeric framerate such as `23.976` or `24.0`
    pub fn from_f64(value: f64) -> Result<FrameRate> {
        Self::normalize(&value.to_string())
    }

    /// Integer frames per second used for frame counting and display
    pub fn nominal_fps(&self) -> u64 {
        match self {
            FrameRate::Fps23_98 | FrameRate::Fps24 => 24,
            FrameRate::Fps25 => 25,
            FrameRate::Fps29_97 | FrameRate::Fps30 => 30,
            FrameRate::Fps59_94 => 60,
        }
    }

    /// Real framerate as a rational (numerator, denominator)
    pub fn as_rational(&self) -> (u64, u64) {
        match self {
            FrameRate::Fps23_98 => (24000, 1001),
            FrameRate::Fps24 => (24, 1),
            FrameRate::Fps25 => (25, 1),
            FrameRate::Fps29_97 => (30000, 1001),
            FrameRate::Fps30 => (30, 1),
            FrameRate::Fps59_94 => (60000, 1001),
        }
    }

    /// Real framerate used for elapsed-time conversions
    pub fn real_fps(&self) -> f64 {
        let (num, den) = self.as_rational();
        num as f64 / den as f64
    }

    /// True for the fractional NTSC-family rates
    pub fn is_pulldown(&self) -> bool {
        matches!(
            self,
            FrameRate::Fps23_98 | FrameRate::Fps29_97 | FrameRate::Fps59_94
        )
    }

    /// Canonical spelling, also used for serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameRate::Fps23_98 => "23.98",
            FrameRate::Fps24 => "24",
            FrameRate::Fps25 => "25",
            FrameRate::Fps29_97 => "29.97",
            FrameRate::Fps30 => "30",
            FrameRate::Fps59_94 => "59.94",
        }
    }

    /// Slowest rate of the same family (pulldown or integer) that can
    /// represent a frame field of `frame_field`
    pub fn smallest_fitting(frame_field: u64, pulldown: bool) -> Option<FrameRate> {
        Self::ALL
            .iter()
            .copied()
            .filter(|rate| rate.is_pulldown() == pulldown)
            .find(|rate| frame_field < rate.nominal_fps())
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameRate {
    type Err = TurnoverError;

    fn from_str(s: &str) -> Result<Self> {
        Self::normalize(s)
    }
}

impl TryFrom<String> for FrameRate {
    type Error = TurnoverError;

    fn try_from(value: String) -> Result<Self> {
        Self::normalize(&value)
    }
}

impl From<FrameRate> for String {
    fn from(rate: FrameRate) -> Self {
        rate.as_str().to_string()
    }
}

/// An immutable frame position at a nominal framerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimecodeRepr", into = "TimecodeRepr")]
pub struct Timecode {
    frames: u64,
    rate: FrameRate,
}

impl Timecode {
    /// Parse an `HH:MM:SS:FF` string at the given rate
    ///
    /// # Arguments
    /// * `rate` - Nominal framerate; its integer fps bounds the frame field
    /// * `text` - Exactly four colon-separated numeric groups
    ///
    /// # Returns
    /// * `Err(MalformedTimecode)` on a wrong group count, non-numeric groups,
    ///   or minutes/seconds/frames out of range
    pub fn parse(rate: FrameRate, text: &str) -> Result<Timecode> {
        let trimmed = text.trim();
        let groups: Vec<&str> = trimmed.split(':').collect();
        if groups.len() != 4 {
            return Err(TurnoverError::malformed(
                text,
                format!("expected 4 colon-separated groups, found {}", groups.len()),
            ));
        }

        let mut values = [0u64; 4];
        for (slot, group) in values.iter_mut().zip(&groups) {
            if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TurnoverError::malformed(
                    text,
                    format!("'{}' is not a number", group),
                ));
            }
            *slot = group
                .parse()
                .map_err(|_| TurnoverError::malformed(text, "group out of range"))?;
        }

        let [hours, minutes, seconds, frames] = values;
        let fps = rate.nominal_fps();
        if minutes >= 60 || seconds >= 60 {
            return Err(TurnoverError::malformed(text, "minutes and seconds must be below 60"));
        }
        if frames >= fps {
            return Err(TurnoverError::malformed(
                text,
                format!("frame field {} does not fit {} fps", frames, rate),
            ));
        }

        let total = hours
            .checked_mul(3600)
            .and_then(|s| s.checked_add(minutes * 60 + seconds))
            .and_then(|s| s.checked_mul(fps))
            .and_then(|f| f.checked_add(frames))
            .ok_or_else(|| TurnoverError::malformed(text, "hours out of range"))?;

        Ok(Timecode { frames: total, rate })
    }

    /// Create a timecode from an absolute frame count
    pub fn from_frames(rate: FrameRate, frames: u64) -> Timecode {
        Timecode { frames, rate }
    }

    /// Re-express `other` at `rate`
    ///
    /// Only allowed between rates that count frames identically (23.98 and
    /// 24, 29.97 and 30); anything else is an explicit conversion the caller
    /// has to make.
    pub fn rebase(rate: FrameRate, other: &Timecode) -> Result<Timecode> {
        if rate.nominal_fps() != other.rate.nominal_fps() {
            return Err(TurnoverError::FramerateMismatch {
                left: rate,
                right: other.rate,
            });
        }
        Ok(Timecode {
            frames: other.frames,
            rate,
        })
    }

    /// Parse several timecode strings that share one rate
    pub fn from_set<'a, I>(rate: FrameRate, texts: I) -> Result<Vec<Timecode>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(|t| Timecode::parse(rate, t)).collect()
    }

    /// Absolute frame index from 00:00:00:00
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Nominal framerate
    pub fn rate(&self) -> FrameRate {
        self.rate
    }

    fn ensure_same_rate(&self, other: &Timecode) -> Result<()> {
        if self.rate != other.rate {
            return Err(TurnoverError::FramerateMismatch {
                left: self.rate,
                right: other.rate,
            });
        }
        Ok(())
    }

    fn with_frames(&self, frames: i128) -> Result<Timecode> {
        if frames < 0 {
            return Err(TurnoverError::TimecodeUnderflow {
                frames: i64::try_from(frames).unwrap_or(i64::MIN),
            });
        }
        let frames = u64::try_from(frames).map_err(|_| overflow())?;
        Ok(Timecode {
            frames,
            rate: self.rate,
        })
    }

    /// Sum of two timecodes at the same rate
    pub fn checked_add(&self, other: &Timecode) -> Result<Timecode> {
        self.ensure_same_rate(other)?;
        let frames = self
            .frames
            .checked_add(other.frames)
            .ok_or_else(overflow)?;
        Ok(Timecode {
            frames,
            rate: self.rate,
        })
    }

    /// Difference of two timecodes at the same rate
    pub fn checked_sub(&self, other: &Timecode) -> Result<Timecode> {
        self.ensure_same_rate(other)?;
        match self.frames.checked_sub(other.frames) {
            Some(frames) => Ok(Timecode {
                frames,
                rate: self.rate,
            }),
            None => Err(TurnoverError::TimecodeUnderflow {
                frames: i64::try_from(i128::from(self.frames) - i128::from(other.frames)).unwrap_or(i64::MIN),
            }),
        }
    }

    /// Shift by a signed number of frames
    pub fn offset(&self, frames: i64) -> Result<Timecode> {
        self.with_frames(i128::from(self.frames) + i128::from(frames))
    }

    /// Multiply the frame count
    pub fn multiply(&self, factor: u64) -> Result<Timecode> {
        let frames = self
            .frames
            .checked_mul(factor)
            .ok_or_else(overflow)?;
        Ok(Timecode {
            frames,
            rate: self.rate,
        })
    }

    /// Divide the frame count, discarding any remainder
    pub fn floor_divide(&self, divisor: u64) -> Result<Timecode> {
        if divisor == 0 {
            return Err(TurnoverError::InvalidArgument(
                "cannot divide a timecode by zero".to_string(),
            ));
        }
        Ok(Timecode {
            frames: self.frames / divisor,
            rate: self.rate,
        })
    }

    /// Signed frame distance from `origin` to `self`
    ///
    /// Distances that do not fit an `i64` are `InvalidArgument`.
    pub fn frames_since(&self, origin: &Timecode) -> Result<i64> {
        self.ensure_same_rate(origin)?;
        i64::try_from(i128::from(self.frames) - i128::from(origin.frames)).map_err(|_| overflow())
    }

    /// Compare two timecodes at the same rate
    pub fn try_cmp(&self, other: &Timecode) -> Result<Ordering> {
        self.ensure_same_rate(other)?;
        Ok(self.frames.cmp(&other.frames))
    }

    /// Real elapsed seconds since 00:00:00:00
    pub fn real_seconds(&self) -> f64 {
        self.frames as f64 / self.rate.real_fps()
    }

    /// Real elapsed seconds between `origin` and `self`
    ///
    /// Uses the fractional rate, so one hour of 23.98 timecode is
    /// 3603.6 seconds. This is the value external frame extraction tools
    /// need.
    pub fn real_seconds_since(&self, origin: &Timecode) -> Result<f64> {
        let distance = self.frames_since(origin)?;
        Ok(distance as f64 / self.rate.real_fps())
    }
}

fn overflow() -> TurnoverError {
    TurnoverError::InvalidArgument("timecode overflow".to_string())
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.rate.nominal_fps();
        let frames = self.frames % fps;
        let total_seconds = self.frames / fps;
        let seconds = total_seconds % 60;
        let minutes = (total_seconds / 60) % 60;
        let hours = total_seconds / 3600;
        write!(f, "{:02}:{:02}:{:02}:{:02}", hours, minutes, seconds, frames)
    }
}

/// Serialized form of a timecode: `{ "rate": "23.98", "timecode": "01:00:00:00" }`
#[derive(Serialize, Deserialize)]
struct TimecodeRepr {
    rate: FrameRate,
    timecode: String,
}

impl From<Timecode> for TimecodeRepr {
    fn from(tc: Timecode) -> Self {
        TimecodeRepr {
            rate: tc.rate,
            timecode: tc.to_string(),
        }
    }
}

impl TryFrom<TimecodeRepr> for Timecode {
    type Error = TurnoverError;

    fn try_from(repr: TimecodeRepr) -> Result<Self> {
        Timecode::parse(repr.rate, &repr.timecode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tc(rate: FrameRate, text: &str) -> Timecode {
        Timecode::parse(rate, text).unwrap()
    }

    #[test]
    fn test_normalize_aliases() {
        for spelling in ["23.976", "23.98", "ntsc-film", "24000/1001", "NTSC-FILM"] {
            assert_eq!(FrameRate::normalize(spelling).unwrap(), FrameRate::Fps23_98);
        }
        assert_eq!(FrameRate::normalize("24.0").unwrap(), FrameRate::Fps24);
        assert_eq!(FrameRate::normalize("film").unwrap(), FrameRate::Fps24);
        assert_eq!(FrameRate::normalize("pal").unwrap(), FrameRate::Fps25);
        assert_eq!(FrameRate::normalize("30000/1001").unwrap(), FrameRate::Fps29_97);
        assert_eq!(FrameRate::normalize("60i").unwrap(), FrameRate::Fps59_94);
        assert_eq!(FrameRate::from_f64(23.976).unwrap(), FrameRate::Fps23_98);
        assert_eq!(FrameRate::from_f64(30.0).unwrap(), FrameRate::Fps30);
    }

    #[test]
    fn test_normalize_unknown() {
        assert!(matches!(
            FrameRate::normalize("48"),
            Err(TurnoverError::UnknownFramerate(s)) if s == "48"
        ));
    }

    #[test]
    fn test_parse_and_display() {
        let t = tc(FrameRate::Fps24, "01:00:00:00");
        assert_eq!(t.frames(), 86_400);
        assert_eq!(t.to_string(), "01:00:00:00");
        assert_eq!(tc(FrameRate::Fps24, "01:10:10:23").to_string(), "01:10:10:23");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["01:00:00", "01:00:00:00:00", "01:xx:00:00", "01:00:00:24", "01:60:00:00", ""] {
            assert!(
                matches!(Timecode::parse(FrameRate::Fps24, bad), Err(TurnoverError::MalformedTimecode { .. })),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_pulldown_counts_like_integer_rate() {
        let a = tc(FrameRate::Fps23_98, "05:00:00:00");
        let b = tc(FrameRate::Fps24, "05:00:00:00");
        assert_eq!(a.frames(), b.frames());
        assert_ne!(a, b);
        assert!(a.real_seconds() > b.real_seconds());
    }

    #[test]
    fn test_real_seconds_uses_fractional_rate() {
        let hour = tc(FrameRate::Fps23_98, "01:00:00:00");
        assert!((hour.real_seconds() - 3603.6).abs() < 1e-9);
        let origin = tc(FrameRate::Fps23_98, "00:59:59:00");
        assert!((hour.real_seconds_since(&origin).unwrap() - 1.001).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = tc(FrameRate::Fps24, "01:00:00:00");
        let b = tc(FrameRate::Fps24, "00:00:30:00");
        assert_eq!(a.checked_add(&b).unwrap().to_string(), "01:00:30:00");
        assert_eq!(a.checked_sub(&b).unwrap().to_string(), "00:59:30:00");
        assert_eq!(a.offset(721).unwrap().to_string(), "01:00:30:01");
        assert_eq!(a.offset(-1).unwrap().to_string(), "00:59:59:23");
        assert_eq!(b.multiply(2).unwrap().to_string(), "00:01:00:00");
        assert_eq!(a.floor_divide(2).unwrap().to_string(), "00:30:00:00");
        assert_eq!(a.offset(-1).unwrap().floor_divide(2).unwrap().to_string(), "00:29:59:23");
    }

    #[test]
    fn test_underflow() {
        let a = tc(FrameRate::Fps24, "00:00:01:00");
        let b = tc(FrameRate::Fps24, "00:00:02:00");
        assert!(matches!(a.checked_sub(&b), Err(TurnoverError::TimecodeUnderflow { frames: -24 })));
        assert!(a.offset(-25).is_err());
        assert_eq!(a.frames_since(&b).unwrap(), -24);
    }

    #[test]
    fn test_frame_counts_beyond_i64() {
        // 150e12 hours at 24 fps is past i64::MAX frames but fits a u64
        let huge = tc(FrameRate::Fps24, "150000000000000:00:00:00");
        let zero = Timecode::from_frames(FrameRate::Fps24, 0);
        assert!(huge.frames() > i64::MAX as u64);

        let back = huge.offset(-1).unwrap();
        assert_eq!(back.frames(), huge.frames() - 1);
        assert_eq!(huge.frames_since(&back).unwrap(), 1);
        assert!(matches!(huge.offset(i64::MAX), Err(TurnoverError::InvalidArgument(_))));

        assert!(matches!(huge.frames_since(&zero), Err(TurnoverError::InvalidArgument(_))));
        assert!(matches!(zero.frames_since(&huge), Err(TurnoverError::InvalidArgument(_))));
        assert!(matches!(
            zero.checked_sub(&huge),
            Err(TurnoverError::TimecodeUnderflow { frames: i64::MIN })
        ));
    }

    #[test]
    fn test_mismatched_rates_never_mix() {
        let a = tc(FrameRate::Fps24, "01:00:00:00");
        let b = tc(FrameRate::Fps23_98, "01:00:00:00");
        assert!(matches!(a.checked_add(&b), Err(TurnoverError::FramerateMismatch { .. })));
        assert!(matches!(a.checked_sub(&b), Err(TurnoverError::FramerateMismatch { .. })));
        assert!(matches!(a.try_cmp(&b), Err(TurnoverError::FramerateMismatch { .. })));
        assert!(a.frames_since(&b).is_err());
    }

    #[test]
    fn test_rebase() {
        let film = tc(FrameRate::Fps24, "01:10:10:23");
        let pulldown = Timecode::rebase(FrameRate::Fps23_98, &film).unwrap();
        assert_eq!(pulldown.frames(), film.frames());
        assert_eq!(pulldown.rate(), FrameRate::Fps23_98);

        let video = tc(FrameRate::Fps30, "01:10:10:23");
        assert!(Timecode::rebase(FrameRate::Fps24, &video).is_err());
    }

    #[test]
    fn test_from_set() {
        let set = Timecode::from_set(FrameRate::Fps24, ["01:10:10:23", "01:10:12:23"]).unwrap();
        assert_eq!(set[1].frames_since(&set[0]).unwrap(), 48);
        assert!(Timecode::from_set(FrameRate::Fps24, ["01:10:10:23", "bogus"]).is_err());
    }

    #[test]
    fn test_smallest_fitting_rate() {
        assert_eq!(FrameRate::smallest_fitting(25, true), Some(FrameRate::Fps29_97));
        assert_eq!(FrameRate::smallest_fitting(24, false), Some(FrameRate::Fps25));
        assert_eq!(FrameRate::smallest_fitting(12, true), Some(FrameRate::Fps23_98));
        assert_eq!(FrameRate::smallest_fitting(61, true), None);
    }

    #[test]
    fn test_serde_shape() {
        let t = tc(FrameRate::Fps23_98, "01:00:00:12");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"rate":"23.98","timecode":"01:00:00:12"}"#);
        let back: Timecode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
