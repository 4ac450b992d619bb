use crate::calendar::CalendarPolicy;
use crate::planner::Allocation;
use std::collections::{BTreeMap, BTreeSet};

/// Chiffres d'un membre sur la période planifiée.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberStats {
    pub name: String,
    pub total_hours: f64,
    pub weekly_hours: BTreeMap<u32, f64>,
    /// Moyenne sur les semaines effectivement travaillées, 0 sans affectation.
    pub average_weekly_hours: f64,
    pub days_worked: usize,
    pub sunday_shifts: usize,
    /// Semaines du planning sous le minimum contractuel (indicatif, jamais imposé).
    pub weeks_below_minimum: Vec<u32>,
}

/// Statistiques calculées à la demande, jamais persistées.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsReport {
    pub members: Vec<MemberStats>,
    pub sunday_shifts_total: usize,
}

impl StatisticsReport {
    pub fn compute(allocation: &Allocation) -> Self {
        let calendar = CalendarPolicy::new();
        let weeks: BTreeSet<u32> = allocation
            .schedule
            .dates()
            .map(CalendarPolicy::week_number)
            .collect();

        let mut sundays: BTreeMap<&str, usize> = BTreeMap::new();
        let mut sunday_shifts_total = 0usize;
        for (date, day) in allocation.schedule.iter() {
            if !calendar.is_sunday(*date) {
                continue;
            }
            sunday_shifts_total += day.len();
            for name in day.keys() {
                *sundays.entry(name.as_str()).or_insert(0) += 1;
            }
        }

        let members = allocation
            .ledgers
            .iter()
            .map(|ledger| MemberStats {
                name: ledger.name().to_string(),
                total_hours: ledger.total_hours(),
                weekly_hours: ledger.weekly_hours().clone(),
                average_weekly_hours: average(ledger.weekly_hours()),
                days_worked: ledger.days_worked(),
                sunday_shifts: sundays.get(ledger.name()).copied().unwrap_or(0),
                weeks_below_minimum: weeks
                    .iter()
                    .copied()
                    .filter(|w| ledger.hours_in_week(*w) < ledger.min_weekly_hours())
                    .collect(),
            })
            .collect();

        Self {
            members,
            sunday_shifts_total,
        }
    }

    pub fn member(&self, name: &str) -> Option<&MemberStats> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn total_hours(&self) -> f64 {
        self.members.iter().fold(0.0, |acc, m| acc + m.total_hours)
    }
}

fn average(weekly: &BTreeMap<u32, f64>) -> f64 {
    if weekly.is_empty() {
        return 0.0;
    }
    weekly.values().fold(0.0, |acc, h| acc + h) / weekly.len() as f64
}
