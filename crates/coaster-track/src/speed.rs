//! Stateless speed modifiers as a function of the track parameter.

use crate::config::StationZone;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SpeedProfile {
    #[default]
    Constant,
    /// Slow down within `width` of the seam, where the station sits.
    Station(StationZone),
}

impl SpeedProfile {
    pub fn from_zone(zone: Option<StationZone>) -> Self {
        zone.map_or(Self::Constant, Self::Station)
    }

    /// Multiplier on the commanded speed at `parameter`.
    pub fn factor(&self, parameter: f64) -> f64 {
        match self {
            Self::Constant => 1.0,
            Self::Station(zone) => {
                if parameter < zone.width || parameter > 1.0 - zone.width {
                    zone.factor
                } else {
                    1.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let p = SpeedProfile::Constant;
        assert_eq!(p.factor(0.0), 1.0);
        assert_eq!(p.factor(0.95), 1.0);
    }

    #[test]
    fn test_station_zone_on_both_sides_of_seam() {
        let p = SpeedProfile::from_zone(Some(StationZone::default()));
        assert_eq!(p.factor(0.05), 0.5);
        assert_eq!(p.factor(0.95), 0.5);
        assert_eq!(p.factor(0.5), 1.0);
        assert_eq!(p.factor(0.1), 1.0);
    }
}
