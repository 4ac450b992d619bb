mod ledger;
mod selection;
mod types;

pub use ledger::MemberLedger;
pub use types::{Allocation, DayAssignments, PlanError, Schedule};

use crate::calendar::CalendarPolicy;
use crate::model::{ShiftType, StaffMember};
use tracing::{debug, info, warn};

/// Moteur d'affectation : une passe gloutonne par jour, sans retour arrière.
///
/// Ne garde aucun état entre deux runs hormis le calendrier des fériés.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationEngine {
    calendar: CalendarPolicy,
}

impl AllocationEngine {
    pub fn new() -> Self {
        Self {
            calendar: CalendarPolicy::new(),
        }
    }

    pub fn calendar(&self) -> &CalendarPolicy {
        &self.calendar
    }

    /// Planifie le mois `year`-`month` pour `staff` avec le catalogue `shifts`.
    ///
    /// Les définitions ne sont pas modifiées : le planning et les registres sont rendus par valeur.
    /// Deux runs sur les mêmes entrées produisent le même planning.
    pub fn run(
        &self,
        year: i32,
        month: u32,
        staff: &[StaffMember],
        shifts: &[ShiftType],
    ) -> Result<Allocation, PlanError> {
        if staff.is_empty() {
            return Err(PlanError::EmptyRoster);
        }
        if shifts.is_empty() {
            return Err(PlanError::EmptyCatalog);
        }
        let days = self.calendar.eligible_days(year, month)?;
        info!(
            year,
            month,
            staff = staff.len(),
            shifts = shifts.len(),
            days = days.len(),
            "planning month"
        );

        let mut ledgers: Vec<MemberLedger> = staff.iter().map(MemberLedger::for_member).collect();
        let mut schedule = Schedule::new();
        let mut skipped_slots = 0usize;

        for day in days {
            let week = CalendarPolicy::week_number(day);
            schedule.open_day(day);

            let mut order: Vec<(usize, f64, u8)> = staff
                .iter()
                .enumerate()
                .filter(|(_, member)| member.is_available(day))
                .map(|(idx, _)| {
                    let ledger = &ledgers[idx];
                    (
                        idx,
                        ledger.hours_in_week(week),
                        selection::rotation_priority(ledger, day, shifts),
                    )
                })
                .collect();
            if order.is_empty() {
                debug!(%day, "nobody available");
                continue;
            }

            // sort_by est stable : à égalité, l'ordre du roster est conservé.
            order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)));

            let previous: Vec<Option<ShiftType>> = order
                .iter()
                .map(|&(idx, _, _)| ledgers[idx].last_shift_before(day).cloned())
                .collect();
            let candidates = selection::pick_shifts(&previous, shifts);

            for (&(idx, _, _), shift) in order.iter().zip(candidates) {
                let ledger = &mut ledgers[idx];
                if !ledger.can_accommodate(week, shift.duration_hours()) {
                    debug!(%day, member = ledger.name(), shift = shift.name(), "weekly ceiling reached");
                    skipped_slots += 1;
                    continue;
                }
                ledger.record_assignment(day, week, shift.clone());
                schedule.assign(day, staff[idx].name(), shift.clone());
            }
            debug!(%day, week, assigned = schedule.day(day).map_or(0, |d| d.len()), "day planned");
        }

        info!(
            filled = schedule.filled_slots(),
            skipped = skipped_slots,
            "planning done"
        );
        Ok(Allocation {
            schedule,
            ledgers,
            skipped_slots,
        })
    }
}

impl Allocation {
    /// Reconstruit les registres à partir d'un planning déjà établi (par exemple rechargé depuis le disque).
    ///
    /// Les entrées qui nomment un membre absent du roster sont ignorées.
    pub fn replay(staff: &[StaffMember], schedule: Schedule) -> Self {
        let mut ledgers: Vec<MemberLedger> = staff.iter().map(MemberLedger::for_member).collect();
        for (date, day) in schedule.iter() {
            let week = CalendarPolicy::week_number(*date);
            for (name, shift) in day {
                match ledgers.iter_mut().find(|l| l.name() == name) {
                    Some(ledger) => ledger.record_assignment(*date, week, shift.clone()),
                    None => warn!(%date, member = %name, "schedule entry for unknown staff member"),
                }
            }
        }
        Self {
            schedule,
            ledgers,
            skipped_slots: 0,
        }
    }
}
