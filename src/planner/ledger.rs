use crate::model::{ShiftType, StaffMember};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Registre d'un membre pour une planification : heures par semaine ISO et turni par date.
///
/// Créé vide à chaque run ; le plafond est copié depuis la définition du membre.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberLedger {
    name: String,
    min_weekly_hours: f64,
    max_weekly_hours: f64,
    weekly_hours: BTreeMap<u32, f64>,
    assignments: BTreeMap<NaiveDate, ShiftType>,
}

impl MemberLedger {
    pub fn for_member(member: &StaffMember) -> Self {
        Self {
            name: member.name().to_string(),
            min_weekly_hours: member.min_weekly_hours(),
            max_weekly_hours: member.max_weekly_hours(),
            weekly_hours: BTreeMap::new(),
            assignments: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn min_weekly_hours(&self) -> f64 {
        self.min_weekly_hours
    }
    pub fn max_weekly_hours(&self) -> f64 {
        self.max_weekly_hours
    }
    pub fn weekly_hours(&self) -> &BTreeMap<u32, f64> {
        &self.weekly_hours
    }
    pub fn assignments(&self) -> &BTreeMap<NaiveDate, ShiftType> {
        &self.assignments
    }

    pub fn hours_in_week(&self, week: u32) -> f64 {
        self.weekly_hours.get(&week).copied().unwrap_or(0.0)
    }

    pub fn can_accommodate(&self, week: u32, hours: f64) -> bool {
        self.hours_in_week(week) + hours <= self.max_weekly_hours
    }

    /// Enregistre le turno sans revérifier le plafond : `can_accommodate` est à la charge de l'appelant.
    pub fn record_assignment(&mut self, date: NaiveDate, week: u32, shift: ShiftType) {
        *self.weekly_hours.entry(week).or_insert(0.0) += shift.duration_hours();
        self.assignments.insert(date, shift);
    }

    /// Turno de la veille, s'il existe.
    pub fn last_shift_before(&self, date: NaiveDate) -> Option<&ShiftType> {
        let yesterday = date.checked_sub_signed(Duration::days(1))?;
        self.assignments.get(&yesterday)
    }

    pub fn total_hours(&self) -> f64 {
        self.weekly_hours.values().fold(0.0, |acc, h| acc + h)
    }

    pub fn days_worked(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn ledger(max: f64) -> MemberLedger {
        MemberLedger::for_member(&StaffMember::new("Anna", 0.0, max, false).unwrap())
    }

    #[test]
    fn accumulates_hours_per_week() {
        let mut l = ledger(12.0);
        let morning = ShiftType::new("Mattina", "08:00", "14:00").unwrap();
        assert_eq!(l.hours_in_week(2), 0.0);
        assert!(l.can_accommodate(2, 6.0));

        l.record_assignment(date(6), 2, morning.clone());
        l.record_assignment(date(7), 2, morning.clone());
        assert_eq!(l.hours_in_week(2), 12.0);
        assert!(!l.can_accommodate(2, 6.0));
        assert!(l.can_accommodate(3, 6.0));
        assert_eq!(l.total_hours(), 12.0);
        assert_eq!(l.days_worked(), 2);
    }

    #[test]
    fn ceiling_is_inclusive() {
        let l = ledger(8.0);
        assert!(l.can_accommodate(1, 8.0));
        assert!(!l.can_accommodate(1, 8.5));
    }

    #[test]
    fn last_shift_only_looks_at_yesterday() {
        let mut l = ledger(40.0);
        let night = ShiftType::new("Notte", "22:00", "06:00").unwrap();
        l.record_assignment(date(6), 2, night.clone());

        assert_eq!(l.last_shift_before(date(7)), Some(&night));
        assert_eq!(l.last_shift_before(date(8)), None);
        assert_eq!(l.last_shift_before(date(6)), None);
    }
}
