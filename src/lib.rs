#![forbid(unsafe_code)]
//! Turni — bibliothèque de planification mensuelle des turni d'une équipe (sans BD).
//!
//! - Passe gloutonne jour par jour, plafond hebdomadaire (semaine ISO) strict.
//! - Repos hebdomadaires, absences ponctuelles, fériés fixes.
//! - Rotation des types de turno pour éviter deux fois le même d'affilée.
//! - Stockage fichier (JSON) et exports CSV derrière la feature `serde`.

pub mod calendar;
#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod planner;
pub mod stats;
#[cfg(feature = "serde")]
pub mod storage;

pub use calendar::{CalendarPolicy, DayKind, FIXED_HOLIDAYS};
pub use model::{Roster, ShiftType, StaffMember, ValidationError};
pub use planner::{Allocation, AllocationEngine, DayAssignments, MemberLedger, PlanError, Schedule};
pub use stats::{MemberStats, StatisticsReport};
#[cfg(feature = "serde")]
pub use storage::{JsonStorage, LoadError, LoadMode, Plan, Storage};
