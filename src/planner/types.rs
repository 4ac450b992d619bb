use super::ledger::MemberLedger;
use crate::model::ShiftType;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

/// Erreurs de configuration d'une planification : aucun planning partiel n'est produit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("roster is empty: add at least one staff member")]
    EmptyRoster,
    #[error("shift catalog is empty: add at least one shift type")]
    EmptyCatalog,
    #[error("invalid period: {year}-{month:02}")]
    InvalidPeriod { year: i32, month: u32 },
}

/// Affectations du jour : nom du membre -> turno.
pub type DayAssignments = BTreeMap<String, ShiftType>;

/// Planning : une entrée par jour éligible, éventuellement vide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    days: BTreeMap<NaiveDate, DayAssignments>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ouvre l'entrée d'un jour (vide si elle n'existe pas encore).
    pub fn open_day(&mut self, date: NaiveDate) -> &mut DayAssignments {
        self.days.entry(date).or_default()
    }

    pub fn assign(&mut self, date: NaiveDate, member: &str, shift: ShiftType) {
        self.open_day(date).insert(member.to_string(), shift);
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayAssignments> {
        self.days.get(&date)
    }

    pub fn shift_of(&self, date: NaiveDate, member: &str) -> Option<&ShiftType> {
        self.days.get(&date).and_then(|day| day.get(member))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayAssignments)> {
        self.days.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// Nombre de jours (vides compris).
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Nombre total de couples (jour, membre) affectés.
    pub fn filled_slots(&self) -> usize {
        self.days.values().map(|d| d.len()).sum()
    }
}

/// Résultat d'une planification : le planning et un registre par membre, dans l'ordre du roster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation {
    pub schedule: Schedule,
    pub ledgers: Vec<MemberLedger>,
    /// Membres disponibles restés sans turno faute de place dans leur plafond.
    pub skipped_slots: usize,
}

impl Allocation {
    pub fn ledger(&self, name: &str) -> Option<&MemberLedger> {
        self.ledgers.iter().find(|l| l.name() == name)
    }
}
