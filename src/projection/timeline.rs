//! Simulation year range

use crate::household::Household;

/// Inclusive range of calendar years covered by a projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    pub start_year: i32,
    pub end_year: i32,
}

impl Timeline {
    /// Run at least `min_horizon_years` past the start, and long enough for
    /// every child to reach `graduation_age`
    pub fn build(household: &Household, start_year: i32, min_horizon_years: i32, graduation_age: i32) -> Self {
        let last_graduation = household
            .children
            .iter()
            .map(|c| c.birth_year.saturating_add(graduation_age))
            .max()
            .unwrap_or(start_year);

        Self {
            start_year,
            end_year: start_year.saturating_add(min_horizon_years).max(last_graduation),
        }
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..=self.end_year
    }

    pub fn len(&self) -> usize {
        (i64::from(self.end_year) - i64::from(self.start_year) + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn elapsed(&self, year: i32) -> i32 {
        year - self.start_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::EducationTrack;
    use crate::household::Child;

    fn household(birth_years: &[i32]) -> Household {
        Household {
            children: birth_years
                .iter()
                .map(|&y| Child::new(y, 1, EducationTrack::A))
                .collect(),
            ..Household::default()
        }
    }

    #[test]
    fn test_minimum_horizon() {
        let timeline = Timeline::build(&household(&[2020]), 2025, 45, 23);
        assert_eq!(timeline.end_year, 2070);
        assert_eq!(timeline.len(), 46);
        assert_eq!(timeline.years().next(), Some(2025));
        assert_eq!(timeline.years().last(), Some(2070));
    }

    #[test]
    fn test_extends_to_last_graduation() {
        // Child born 2050 graduates in 2073
        let timeline = Timeline::build(&household(&[2025, 2050]), 2025, 45, 23);
        assert_eq!(timeline.end_year, 2073);
        assert_eq!(timeline.len(), 49);
        assert_eq!(timeline.elapsed(2073), 48);
    }

    #[test]
    fn test_extreme_birth_year_does_not_overflow() {
        let timeline = Timeline::build(&household(&[i32::MAX - 5]), 2025, 45, 23);
        assert_eq!(timeline.end_year, i32::MAX);

        let childless = Timeline::build(&household(&[]), 2025, 45, 23);
        assert_eq!(childless.end_year, 2070);
    }
}
