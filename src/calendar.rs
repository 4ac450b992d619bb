use crate::planner::PlanError;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Jours fériés fixes (mois, jour), non configurables.
pub const FIXED_HOLIDAYS: [(u32, u32); 5] = [(1, 1), (4, 20), (5, 1), (12, 25), (12, 26)];

/// Classement d'une date pour l'affichage et les statistiques.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Holiday,
    Sunday,
    Ordinary,
}

impl DayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayKind::Holiday => "holiday",
            DayKind::Sunday => "sunday",
            DayKind::Ordinary => "ordinary",
        }
    }
}

/// Calendrier : jours ouvrables d'un mois et classement des dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarPolicy;

impl CalendarPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Tous les jours du mois, dans l'ordre, hors fériés fixes. Les dimanches restent éligibles.
    pub fn eligible_days(&self, year: i32, month: u32) -> Result<Vec<NaiveDate>, PlanError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(PlanError::InvalidPeriod { year, month })?;
        Ok(first
            .iter_days()
            .take_while(|d| d.month() == month)
            .filter(|d| !self.is_holiday(*d))
            .collect())
    }

    /// Jours éligibles groupés par numéro de semaine ISO.
    pub fn weeks_of_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<BTreeMap<u32, Vec<NaiveDate>>, PlanError> {
        let mut weeks: BTreeMap<u32, Vec<NaiveDate>> = BTreeMap::new();
        for day in self.eligible_days(year, month)? {
            weeks.entry(Self::week_number(day)).or_default().push(day);
        }
        Ok(weeks)
    }

    /// Numéro de semaine ISO-8601 (1-53), clé du registre d'heures.
    pub fn week_number(date: NaiveDate) -> u32 {
        date.iso_week().week()
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        FIXED_HOLIDAYS.contains(&(date.month(), date.day()))
    }

    pub fn is_sunday(&self, date: NaiveDate) -> bool {
        date.weekday() == Weekday::Sun
    }

    pub fn day_kind(&self, date: NaiveDate) -> DayKind {
        if self.is_holiday(date) {
            DayKind::Holiday
        } else if self.is_sunday(date) {
            DayKind::Sunday
        } else {
            DayKind::Ordinary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn january_excludes_new_year_but_keeps_sundays() {
        let cal = CalendarPolicy::new();
        let days = cal.eligible_days(2025, 1).unwrap();
        assert_eq!(days.len(), 30);
        assert_eq!(days[0], date(2025, 1, 2));
        assert!(!days.contains(&date(2025, 1, 1)));
        for d in [5, 12, 19, 26] {
            assert!(days.contains(&date(2025, 1, d)));
        }
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn december_drops_both_christmas_days() {
        let days = CalendarPolicy::new().eligible_days(2025, 12).unwrap();
        assert_eq!(days.len(), 29);
        assert!(!days.contains(&date(2025, 12, 25)));
        assert!(!days.contains(&date(2025, 12, 26)));
    }

    #[test]
    fn leap_february() {
        let cal = CalendarPolicy::new();
        assert_eq!(cal.eligible_days(2024, 2).unwrap().len(), 29);
        assert_eq!(cal.eligible_days(2025, 2).unwrap().len(), 28);
    }

    #[test]
    fn invalid_month_is_rejected() {
        let err = CalendarPolicy::new().eligible_days(2025, 13).unwrap_err();
        assert!(matches!(err, PlanError::InvalidPeriod { year: 2025, month: 13 }));
    }

    #[test]
    fn iso_week_spans_month_boundary() {
        // 30/12/2024 appartient à la semaine 1 de 2025.
        assert_eq!(CalendarPolicy::week_number(date(2024, 12, 30)), 1);
        assert_eq!(CalendarPolicy::week_number(date(2025, 1, 5)), 1);
        assert_eq!(CalendarPolicy::week_number(date(2025, 1, 6)), 2);
        assert_eq!(CalendarPolicy::week_number(date(2026, 12, 31)), 53);
    }

    #[test]
    fn weeks_of_month_groups_by_iso_week() {
        let weeks = CalendarPolicy::new().weeks_of_month(2025, 1).unwrap();
        assert_eq!(weeks.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(weeks[&1].len(), 4); // 2..=5 janvier
        assert_eq!(weeks[&5].len(), 5); // 27..=31 janvier
    }

    #[test]
    fn classification() {
        let cal = CalendarPolicy::new();
        assert_eq!(cal.day_kind(date(2025, 12, 25)), DayKind::Holiday);
        assert_eq!(cal.day_kind(date(2025, 1, 12)), DayKind::Sunday);
        assert_eq!(cal.day_kind(date(2025, 1, 13)), DayKind::Ordinary);
        assert!(cal.is_holiday(date(2025, 4, 20)));
        assert!(cal.is_sunday(date(2025, 4, 20)));
    }
}
