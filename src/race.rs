/// Race definitions: standard distances and base pace entry
use std::fmt;
use std::str::FromStr;

use crate::errors::{PacingError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceDistance {
    TenK,
    HalfMarathon,
    Marathon,
    Custom(f64),
}

impl RaceDistance {
    pub fn km(&self) -> f64 {
        match self {
            RaceDistance::TenK => 10.0,
            RaceDistance::HalfMarathon => 21.095,
            RaceDistance::Marathon => 42.195,
            RaceDistance::Custom(km) => *km,
        }
    }
}

impl fmt::Display for RaceDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceDistance::TenK => write!(f, "10 Km"),
            RaceDistance::HalfMarathon => write!(f, "21.095 Km"),
            RaceDistance::Marathon => write!(f, "42.195 Km"),
            RaceDistance::Custom(km) => write!(f, "{} Km", km),
        }
    }
}

impl FromStr for RaceDistance {
    type Err = PacingError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "10k" | "10km" => return Ok(RaceDistance::TenK),
            "half" | "half-marathon" | "21k" => return Ok(RaceDistance::HalfMarathon),
            "marathon" | "full" | "42k" => return Ok(RaceDistance::Marathon),
            _ => {}
        }

        let km: f64 = normalized
            .trim_end_matches("km")
            .trim()
            .parse()
            .map_err(|_| PacingError::InvalidInput(format!("unrecognised race distance '{}'", s)))?;

        if !km.is_finite() || km <= 0.0 {
            return Err(PacingError::InvalidInput(format!(
                "race distance must be positive, got {}",
                km
            )));
        }

        // Snap exact standard values so they display by name
        Ok(match km {
            x if x == 10.0 => RaceDistance::TenK,
            x if x == 21.095 => RaceDistance::HalfMarathon,
            x if x == 42.195 => RaceDistance::Marathon,
            x => RaceDistance::Custom(x),
        })
    }
}

/// Target pace on flat ground in training conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasePace {
    pub sec_per_km: f64,
}

impl BasePace {
    pub fn from_min_sec(minutes: u32, seconds: u32) -> Result<Self> {
        if seconds >= 60 {
            return Err(PacingError::InvalidInput(format!(
                "pace seconds must be below 60, got {}",
                seconds
            )));
        }
        let sec_per_km = minutes as f64 * 60.0 + seconds as f64;
        if sec_per_km <= 0.0 {
            return Err(PacingError::InvalidInput("base pace must be positive".to_string()));
        }
        Ok(BasePace { sec_per_km })
    }

    /// Parse "m:ss" (e.g. "5:00") or a plain number of seconds per km.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || PacingError::InvalidInput(format!("unrecognised pace '{}', expected m:ss", s));

        match s.trim().split_once(':') {
            Some((minutes, seconds)) => {
                let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;
                let seconds: u32 = seconds.trim().parse().map_err(|_| invalid())?;
                BasePace::from_min_sec(minutes, seconds)
            }
            None => {
                let sec_per_km: f64 = s.trim().parse().map_err(|_| invalid())?;
                if !sec_per_km.is_finite() || sec_per_km <= 0.0 {
                    return Err(PacingError::InvalidInput("base pace must be positive".to_string()));
                }
                Ok(BasePace { sec_per_km })
            }
        }
    }

    /// Finish time at this pace with no course or condition adjustments.
    pub fn base_time_sec(&self, distance_km: f64) -> f64 {
        self.sec_per_km * distance_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_distances() {
        assert_eq!("10k".parse::<RaceDistance>().unwrap(), RaceDistance::TenK);
        assert_eq!("half".parse::<RaceDistance>().unwrap().km(), 21.095);
        assert_eq!("Marathon".parse::<RaceDistance>().unwrap().km(), 42.195);
        assert_eq!("42.195".parse::<RaceDistance>().unwrap(), RaceDistance::Marathon);
    }

    #[test]
    fn test_custom_distance() {
        let distance: RaceDistance = "15.5km".parse().unwrap();
        assert_eq!(distance, RaceDistance::Custom(15.5));
        assert_eq!(distance.to_string(), "15.5 Km");

        assert!("-3".parse::<RaceDistance>().is_err());
        assert!("ultra".parse::<RaceDistance>().is_err());
    }

    #[test]
    fn test_pace_parsing() {
        assert_eq!(BasePace::parse("5:00").unwrap().sec_per_km, 300.0);
        assert_eq!(BasePace::parse("4:35").unwrap().sec_per_km, 275.0);
        assert_eq!(BasePace::parse("290").unwrap().sec_per_km, 290.0);
        assert!(BasePace::parse("5:75").is_err());
        assert!(BasePace::parse("0:00").is_err());
        assert!(BasePace::parse("fast").is_err());
    }

    #[test]
    fn test_large_minutes_do_not_overflow() {
        let pace = BasePace::parse("99999999:00").unwrap();
        assert_eq!(pace.sec_per_km, 99_999_999.0 * 60.0);

        let pace = BasePace::from_min_sec(u32::MAX, 59).unwrap();
        assert_eq!(pace.sec_per_km, u32::MAX as f64 * 60.0 + 59.0);
    }

    #[test]
    fn test_base_time() {
        let pace = BasePace::from_min_sec(5, 0).unwrap();
        assert_eq!(pace.base_time_sec(10.0), 3000.0);
    }
}
