use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use teebox_core::config::NassauDefaults;
use teebox_core::course::{CourseSetup, HoleCount};
use teebox_core::error::EngineError;

/// One of the three independent bets in a Nassau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Front,
    Back,
    Overall,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Front, Region::Back, Region::Overall];

    /// Holes covered by the region, or `None` when the round has no such region.
    pub fn holes(self, holes: HoleCount) -> Option<RangeInclusive<u8>> {
        match (self, holes) {
            (Self::Front, _) => Some(1..=9),
            (Self::Back, HoleCount::Nine) => None,
            (Self::Back, HoleCount::Eighteen) => Some(10..=18),
            (Self::Overall, holes) => Some(1..=holes.count()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Front => "Front 9",
            Self::Back => "Back 9",
            Self::Overall => "Overall",
        }
    }
}

/// Settings for a Nassau game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NassauSettings {
    pub course: CourseSetup,
    pub front_bet: f64,
    pub back_bet: f64,
    pub overall_bet: f64,
    pub auto_press: bool,
    /// Holes down before a press is suggested.
    pub press_trigger: u32,
    /// Maximum presses per pair and region (0 = unlimited).
    pub press_limit: u32,
}

impl Default for NassauSettings {
    fn default() -> Self {
        Self::from_defaults(CourseSetup::default(), &NassauDefaults::default())
    }
}

impl NassauSettings {
    pub fn from_defaults(course: CourseSetup, defaults: &NassauDefaults) -> Self {
        Self {
            course,
            front_bet: defaults.front_bet,
            back_bet: defaults.back_bet,
            overall_bet: defaults.overall_bet,
            auto_press: defaults.auto_press,
            press_trigger: defaults.press_trigger,
            press_limit: defaults.press_limit,
        }
    }

    pub fn bet_for(&self, region: Region) -> f64 {
        match region {
            Region::Front => self.front_bet,
            Region::Back => self.back_bet,
            Region::Overall => self.overall_bet,
        }
    }

    /// Regions played in this round, in display order.
    pub fn regions(&self) -> Vec<(Region, RangeInclusive<u8>)> {
        Region::ALL
            .into_iter()
            .filter_map(|region| region.holes(self.course.holes).map(|holes| (region, holes)))
            .collect()
    }

    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        for region in Region::ALL {
            EngineError::check_amount(region.label(), self.bet_for(region))?;
        }
        Ok(())
    }

    /// Whether another press may be suggested given how many already exist.
    pub(crate) fn press_allowed(&self, existing: usize) -> bool {
        self.press_limit == 0 || existing < self.press_limit as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_hole_round_skips_back() {
        let mut settings = NassauSettings::default();
        settings.course.holes = HoleCount::Nine;
        let regions: Vec<Region> = settings.regions().into_iter().map(|(r, _)| r).collect();
        assert_eq!(regions, vec![Region::Front, Region::Overall]);
        assert_eq!(Region::Overall.holes(HoleCount::Nine), Some(1..=9));
    }

    #[test]
    fn eighteen_hole_regions() {
        let settings = NassauSettings::default();
        let regions = settings.regions();
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[1], (Region::Back, 10..=18));
        assert_eq!(regions[2], (Region::Overall, 1..=18));
    }

    #[test]
    fn press_limit_zero_is_unlimited() {
        let mut settings = NassauSettings::default();
        settings.press_limit = 0;
        assert!(settings.press_allowed(50));
        settings.press_limit = 2;
        assert!(settings.press_allowed(1));
        assert!(!settings.press_allowed(2));
    }

    #[test]
    fn negative_bet_rejected() {
        let settings = NassauSettings {
            back_bet: -1.0,
            ..NassauSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
