use crate::model::{Roster, ShiftType, StaffMember, ValidationError};
use crate::planner::Schedule;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::warn;

/// État persisté : roster, catalogue et dernier planning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub roster: Roster,
    pub schedule: Schedule,
}

pub trait Storage {
    /// Charge un plan depuis un support (plan vide si le support n'existe pas).
    fn load(&self) -> anyhow::Result<Plan>;
    /// Sauvegarde de manière atomique.
    fn save(&self, plan: &Plan) -> anyhow::Result<()>;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("invalid staff record {name:?}: {source}")]
    InvalidStaff {
        name: String,
        source: ValidationError,
    },
    #[error("invalid shift record {name:?}: {source}")]
    InvalidShift {
        name: String,
        source: ValidationError,
    },
    #[error("invalid date {0:?}")]
    InvalidDate(String),
    #[error("schedule entry {date} for {member:?} references unknown shift {shift:?}")]
    UnresolvedShift {
        date: String,
        member: String,
        shift: String,
    },
    #[error("schedule entry {date} references unknown staff member {member:?}")]
    UnresolvedStaff { date: String, member: String },
}

/// Lenient : les entrées invalides sont journalisées puis ignorées. Strict : la première fait échouer le chargement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    #[default]
    Lenient,
    Strict,
}

impl LoadMode {
    fn reject(self, err: LoadError) -> Result<(), LoadError> {
        match self {
            LoadMode::Strict => Err(err),
            LoadMode::Lenient => {
                warn!(error = %err, "skipping persisted entry");
                Ok(())
            }
        }
    }
}

/// Document JSON tel qu'écrit sur disque.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDocument {
    #[serde(default)]
    pub staff: Vec<StaffRecord>,
    #[serde(default)]
    pub shifts: Vec<ShiftRecord>,
    /// date ISO -> membre -> nom du turno
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schedule: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRecord {
    pub name: String,
    pub min_weekly_hours: f64,
    pub max_weekly_hours: f64,
    #[serde(default)]
    pub overtime_allowed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rest_weekdays: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub absences: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub name: String,
    pub start: String,
    pub end: String,
}

impl PlanDocument {
    pub fn from_plan(plan: &Plan) -> Self {
        let staff = plan
            .roster
            .staff
            .iter()
            .map(|m| StaffRecord {
                name: m.name().to_string(),
                min_weekly_hours: m.min_weekly_hours(),
                max_weekly_hours: m.max_weekly_hours(),
                overtime_allowed: m.overtime_allowed(),
                rest_weekdays: m.rest_weekdays().iter().copied().collect(),
                absences: m.absences().iter().map(|d| d.to_string()).collect(),
            })
            .collect();
        let shifts = plan
            .roster
            .shifts
            .iter()
            .map(|s| ShiftRecord {
                name: s.name().to_string(),
                start: s.start_label(),
                end: s.end_label(),
            })
            .collect();
        let schedule = plan
            .schedule
            .iter()
            .map(|(date, day)| {
                let names = day
                    .iter()
                    .map(|(member, shift)| (member.clone(), shift.name().to_string()))
                    .collect();
                (date.to_string(), names)
            })
            .collect();
        Self {
            staff,
            shifts,
            schedule,
            updated_at: None,
        }
    }

    /// Reconstruit le plan ; les turni du planning sont résolus par nom dans le catalogue.
    pub fn into_plan(self, mode: LoadMode) -> Result<Plan, LoadError> {
        let mut roster = Roster::default();

        for rec in self.staff {
            match staff_from_record(&rec, mode)? {
                Ok(member) => {
                    if let Err(source) = roster.add_staff(member) {
                        mode.reject(LoadError::InvalidStaff { name: rec.name, source })?;
                    }
                }
                Err(source) => mode.reject(LoadError::InvalidStaff { name: rec.name, source })?,
            }
        }

        for rec in self.shifts {
            let added = ShiftType::new(rec.name.clone(), &rec.start, &rec.end)
                .and_then(|shift| roster.add_shift(shift));
            if let Err(source) = added {
                mode.reject(LoadError::InvalidShift { name: rec.name, source })?;
            }
        }

        let mut schedule = Schedule::new();
        for (raw_date, day) in self.schedule {
            let Some(date) = parse_date(&raw_date) else {
                mode.reject(LoadError::InvalidDate(raw_date))?;
                continue;
            };
            schedule.open_day(date);
            for (member, shift_name) in day {
                // Les entrées prennent l'orthographe du roster pour le membre comme pour le turno.
                let Some(staff) = roster.find_staff(&member) else {
                    mode.reject(LoadError::UnresolvedStaff {
                        date: raw_date.clone(),
                        member,
                    })?;
                    continue;
                };
                match roster.find_shift(&shift_name) {
                    Some(shift) => schedule.assign(date, staff.name(), shift.clone()),
                    None => mode.reject(LoadError::UnresolvedShift {
                        date: raw_date.clone(),
                        member,
                        shift: shift_name,
                    })?,
                }
            }
        }

        Ok(Plan { roster, schedule })
    }
}

// Erreur externe : le mode a refusé ; erreur interne : record invalide à signaler.
fn staff_from_record(
    rec: &StaffRecord,
    mode: LoadMode,
) -> Result<Result<StaffMember, ValidationError>, LoadError> {
    let mut member = match StaffMember::new(
        rec.name.clone(),
        rec.min_weekly_hours,
        rec.max_weekly_hours,
        rec.overtime_allowed,
    ) {
        Ok(m) => m,
        Err(e) => return Ok(Err(e)),
    };
    for day in &rec.rest_weekdays {
        if let Err(e) = member.add_rest_day(*day) {
            return Ok(Err(e));
        }
    }
    for raw in &rec.absences {
        match parse_date(raw) {
            Some(date) => {
                member.add_absence(date);
            }
            None => mode.reject(LoadError::InvalidDate(raw.clone()))?,
        }
    }
    Ok(Ok(member))
}

/// Accepte `YYYY-MM-DD` ou un datetime ISO sans fuseau (on garde la date).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.parse::<NaiveDate>()
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|dt| dt.date()))
}

pub struct JsonStorage {
    path: PathBuf,
    mode: LoadMode,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            mode: LoadMode::Lenient,
        })
    }

    pub fn strict(mut self) -> Self {
        self.mode = LoadMode::Strict;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Supprime le fichier de données s'il existe.
    pub fn delete(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("removing {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Plan> {
        if !self.path.exists() {
            return Ok(Plan::default());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let doc: PlanDocument = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        let plan = doc.into_plan(self.mode)?;
        Ok(plan)
    }

    fn save(&self, plan: &Plan) -> anyhow::Result<()> {
        let mut doc = PlanDocument::from_plan(plan);
        doc.updated_at = Some(Utc::now());
        let json = serde_json::to_vec_pretty(&doc)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
