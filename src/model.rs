use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Heures contenues dans une semaine : plafond au-delà duquel une borne n'a pas de sens.
pub const HOURS_PER_WEEK: f64 = 168.0;

/// Erreurs de construction : une définition invalide n'entre jamais dans le roster.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("invalid time {0:?}: expected HH:MM")]
    InvalidTime(String),
    #[error("shift start and end cannot be equal")]
    ZeroLengthShift,
    #[error("invalid weekly hours: min {min}, max {max}")]
    InvalidHours { min: f64, max: f64 },
    #[error("invalid weekday index {0}: expected 0 (Monday) to 6 (Sunday)")]
    InvalidWeekday(u8),
    #[error("staff member already exists: {0}")]
    DuplicateStaff(String),
    #[error("shift type already exists: {0}")]
    DuplicateShift(String),
    #[error("unknown staff member: {0}")]
    UnknownStaff(String),
    #[error("unknown shift type: {0}")]
    UnknownShift(String),
}

/// Membre du personnel : contraintes fixes, sans état de planification.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffMember {
    name: String,
    min_weekly_hours: f64,
    max_weekly_hours: f64,
    overtime_allowed: bool,
    rest_weekdays: BTreeSet<u8>,
    absences: BTreeSet<NaiveDate>,
}

impl StaffMember {
    /// Crée un membre en validant le nom et la bande horaire hebdomadaire.
    pub fn new<N: Into<String>>(
        name: N,
        min_weekly_hours: f64,
        max_weekly_hours: f64,
        overtime_allowed: bool,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let in_range = |h: f64| h.is_finite() && (0.0..=HOURS_PER_WEEK).contains(&h);
        if !in_range(min_weekly_hours)
            || !in_range(max_weekly_hours)
            || min_weekly_hours > max_weekly_hours
        {
            return Err(ValidationError::InvalidHours {
                min: min_weekly_hours,
                max: max_weekly_hours,
            });
        }
        Ok(Self {
            name,
            min_weekly_hours,
            max_weekly_hours,
            overtime_allowed,
            rest_weekdays: BTreeSet::new(),
            absences: BTreeSet::new(),
        })
    }

    pub fn with_rest_day(mut self, weekday: u8) -> Result<Self, ValidationError> {
        self.add_rest_day(weekday)?;
        Ok(self)
    }

    pub fn with_absence(mut self, date: NaiveDate) -> Self {
        self.add_absence(date);
        self
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
    pub fn overtime_allowed(&self) -> bool {
        self.overtime_allowed
    }
    pub fn rest_weekdays(&self) -> &BTreeSet<u8> {
        &self.rest_weekdays
    }
    pub fn absences(&self) -> &BTreeSet<NaiveDate> {
        &self.absences
    }

    /// Ajoute un jour de repos hebdomadaire (0 = lundi, 6 = dimanche).
    pub fn add_rest_day(&mut self, weekday: u8) -> Result<(), ValidationError> {
        if weekday > 6 {
            return Err(ValidationError::InvalidWeekday(weekday));
        }
        self.rest_weekdays.insert(weekday);
        Ok(())
    }

    pub fn remove_rest_day(&mut self, weekday: u8) -> bool {
        self.rest_weekdays.remove(&weekday)
    }

    pub fn add_absence(&mut self, date: NaiveDate) -> bool {
        self.absences.insert(date)
    }

    pub fn remove_absence(&mut self, date: NaiveDate) -> bool {
        self.absences.remove(&date)
    }

    /// Disponible sauf jour de repos hebdomadaire ou absence à la date exacte.
    pub fn is_available(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().num_days_from_monday() as u8;
        !self.rest_weekdays.contains(&weekday) && !self.absences.contains(&date)
    }
}

/// Type de turno : intervalle horaire nommé, durée calculée une fois.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftType {
    name: String,
    start: NaiveTime,
    end: NaiveTime,
    duration_hours: f64,
}

impl ShiftType {
    /// Parse `start`/`end` au format `HH:MM`.
    pub fn new<N: Into<String>>(name: N, start: &str, end: &str) -> Result<Self, ValidationError> {
        let start = parse_clock(start)?;
        let end = parse_clock(end)?;
        Self::from_times(name, start, end)
    }

    /// Les secondes sont ignorées : précision à la minute.
    pub fn from_times<N: Into<String>>(
        name: N,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let start = truncate_to_minute(start);
        let end = truncate_to_minute(end);
        if start == end {
            return Err(ValidationError::ZeroLengthShift);
        }
        Ok(Self {
            name,
            start,
            end,
            duration_hours: span_hours(start, end),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn start(&self) -> NaiveTime {
        self.start
    }
    pub fn end(&self) -> NaiveTime {
        self.end
    }
    pub fn duration_hours(&self) -> f64 {
        self.duration_hours
    }
    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }
    pub fn start_label(&self) -> String {
        self.start.format("%H:%M").to_string()
    }
    pub fn end_label(&self) -> String {
        self.end.format("%H:%M").to_string()
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}-{}, {}h)",
            self.name,
            self.start_label(),
            self.end_label(),
            self.duration_hours
        )
    }
}

fn parse_clock(raw: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(raw.to_string()))
}

fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

// fin < début : le turno passe minuit, on ajoute 24h à la fin.
fn span_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    let start_min = start.hour() * 60 + start.minute();
    let mut end_min = end.hour() * 60 + end.minute();
    if end_min < start_min {
        end_min += 24 * 60;
    }
    f64::from(end_min - start_min) / 60.0
}

/// Roster : personnel ordonné + catalogue des turni.
///
/// L'ordre du personnel est l'ordre de départage du moteur. Les noms sont
/// uniques sans tenir compte de la casse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub staff: Vec<StaffMember>,
    pub shifts: Vec<ShiftType>,
}

impl Roster {
    pub fn add_staff(&mut self, member: StaffMember) -> Result<(), ValidationError> {
        if self.find_staff(member.name()).is_some() {
            return Err(ValidationError::DuplicateStaff(member.name().to_string()));
        }
        self.staff.push(member);
        Ok(())
    }

    pub fn remove_staff(&mut self, name: &str) -> Result<StaffMember, ValidationError> {
        let pos = self
            .staff
            .iter()
            .position(|m| same_name(m.name(), name))
            .ok_or_else(|| ValidationError::UnknownStaff(name.to_string()))?;
        Ok(self.staff.remove(pos))
    }

    pub fn find_staff(&self, name: &str) -> Option<&StaffMember> {
        self.staff.iter().find(|m| same_name(m.name(), name))
    }

    pub fn find_staff_mut(&mut self, name: &str) -> Option<&mut StaffMember> {
        self.staff.iter_mut().find(|m| same_name(m.name(), name))
    }

    pub fn add_shift(&mut self, shift: ShiftType) -> Result<(), ValidationError> {
        if self.find_shift(shift.name()).is_some() {
            return Err(ValidationError::DuplicateShift(shift.name().to_string()));
        }
        self.shifts.push(shift);
        Ok(())
    }

    pub fn remove_shift(&mut self, name: &str) -> Result<ShiftType, ValidationError> {
        let pos = self
            .shifts
            .iter()
            .position(|s| same_name(s.name(), name))
            .ok_or_else(|| ValidationError::UnknownShift(name.to_string()))?;
        Ok(self.shifts.remove(pos))
    }

    pub fn find_shift(&self, name: &str) -> Option<&ShiftType> {
        self.shifts.iter().find(|s| same_name(s.name(), name))
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
