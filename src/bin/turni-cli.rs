#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use turni::{
    io,
    model::{ShiftType, StaffMember},
    planner::{Allocation, AllocationEngine, Schedule},
    stats::StatisticsReport,
    storage::{JsonStorage, Storage},
    CalendarPolicy,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification des turni mensuels (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de données (personnel, turni, dernier planning)
    #[arg(long, global = true, default_value = "turni.json")]
    data: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un membre du personnel
    AddStaff {
        #[arg(long)]
        name: String,
        /// Heures hebdomadaires minimales (indicatives)
        #[arg(long)]
        min: f64,
        /// Heures hebdomadaires maximales (plafond strict)
        #[arg(long)]
        max: f64,
        #[arg(long)]
        overtime: bool,
        /// liste "0,6" ou "mon,sun"
        #[arg(long)]
        rest_days: Option<String>,
        /// liste "2025-01-15,2025-01-16"
        #[arg(long)]
        absences: Option<String>,
    },

    /// Retirer un membre du personnel
    RemoveStaff {
        #[arg(long)]
        name: String,
    },

    /// Ajouter une absence (YYYY-MM-DD)
    AddAbsence {
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: String,
    },

    /// Retirer une absence (YYYY-MM-DD)
    RemoveAbsence {
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: String,
    },

    /// Ajouter un type de turno
    AddShift {
        #[arg(long)]
        name: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM (avant `start` : le turno passe minuit)
        #[arg(long)]
        end: String,
    },

    /// Retirer un type de turno
    RemoveShift {
        #[arg(long)]
        name: String,
    },

    /// Importer du personnel depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Importer des turni depuis un CSV
    ImportShifts {
        #[arg(long)]
        csv: String,
    },

    /// Lister personnel et turni
    List {
        /// Exporte aussi le personnel et ses contraintes en CSV
        #[arg(long)]
        staff_csv: Option<String>,
    },

    /// Planifier un mois (par défaut : mois courant)
    Plan {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        stats_csv: Option<String>,
        #[arg(long)]
        staff_csv: Option<String>,
    },

    /// Afficher le dernier planning enregistré
    Show {
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Statistiques du dernier planning enregistré
    Stats {
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.data)?;
    let mut plan = storage.load()?;
    let calendar = CalendarPolicy::new();

    let code = match cli.cmd {
        Commands::AddStaff {
            name,
            min,
            max,
            overtime,
            rest_days,
            absences,
        } => {
            let mut member = StaffMember::new(name, min, max, overtime)?;
            for raw in split_list(rest_days.as_deref()) {
                member.add_rest_day(io::parse_weekday(raw)?)?;
            }
            for raw in split_list(absences.as_deref()) {
                member.add_absence(parse_day(raw)?);
            }
            plan.roster.add_staff(member)?;
            storage.save(&plan)?;
            0
        }
        Commands::RemoveStaff { name } => {
            let removed = plan.roster.remove_staff(&name)?;
            storage.save(&plan)?;
            println!("Removed {}", removed.name());
            0
        }
        Commands::AddAbsence { name, date } => {
            let date = parse_day(&date)?;
            let member = plan
                .roster
                .find_staff_mut(&name)
                .ok_or_else(|| anyhow::anyhow!("unknown staff member: {}", name))?;
            member.add_absence(date);
            storage.save(&plan)?;
            0
        }
        Commands::RemoveAbsence { name, date } => {
            let date = parse_day(&date)?;
            let member = plan
                .roster
                .find_staff_mut(&name)
                .ok_or_else(|| anyhow::anyhow!("unknown staff member: {}", name))?;
            if !member.remove_absence(date) {
                bail!("{} has no absence on {}", member.name(), date);
            }
            storage.save(&plan)?;
            0
        }
        Commands::AddShift { name, start, end } => {
            let shift = ShiftType::new(name, &start, &end)?;
            println!("Added {shift}");
            plan.roster.add_shift(shift)?;
            storage.save(&plan)?;
            0
        }
        Commands::RemoveShift { name } => {
            plan.roster.remove_shift(&name)?;
            storage.save(&plan)?;
            0
        }
        Commands::ImportStaff { csv } => {
            for member in io::import_staff_csv(csv)? {
                plan.roster.add_staff(member)?;
            }
            storage.save(&plan)?;
            0
        }
        Commands::ImportShifts { csv } => {
            for shift in io::import_shifts_csv(csv)? {
                plan.roster.add_shift(shift)?;
            }
            storage.save(&plan)?;
            0
        }
        Commands::List { staff_csv } => {
            for m in &plan.roster.staff {
                let rest: Vec<String> = m.rest_weekdays().iter().map(|d| d.to_string()).collect();
                println!(
                    "{} | {}-{}h/week | overtime: {} | rest: {} | absences: {}",
                    m.name(),
                    m.min_weekly_hours(),
                    m.max_weekly_hours(),
                    if m.overtime_allowed() { "yes" } else { "no" },
                    if rest.is_empty() { "-".to_string() } else { rest.join(",") },
                    m.absences().len()
                );
            }
            for s in &plan.roster.shifts {
                println!("{s}");
            }
            if let Some(path) = staff_csv {
                io::export_staff_csv(path, &plan.roster.staff)?;
            }
            0
        }
        Commands::Plan {
            year,
            month,
            out_csv,
            stats_csv,
            staff_csv,
        } => {
            let today = Local::now().date_naive();
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());

            let engine = AllocationEngine::new();
            let allocation = engine.run(year, month, &plan.roster.staff, &plan.roster.shifts)?;
            print_schedule(&allocation.schedule, &calendar);

            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &allocation.schedule, &calendar)?;
            }
            if let Some(path) = stats_csv {
                io::export_statistics_csv(path, &StatisticsReport::compute(&allocation))?;
            }
            if let Some(path) = staff_csv {
                io::export_staff_csv(path, &plan.roster.staff)?;
            }

            let skipped = allocation.skipped_slots;
            plan.schedule = allocation.schedule;
            storage.save(&plan)?;

            if skipped > 0 {
                eprintln!("{skipped} available slot(s) left empty (weekly ceiling reached)");
                // Code 2 = WARNING/INCOMPLETE
                2
            } else {
                0
            }
        }
        Commands::Show { out_csv } => {
            if plan.schedule.is_empty() {
                bail!("no schedule saved: run `plan` first");
            }
            print_schedule(&plan.schedule, &calendar);
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &plan.schedule, &calendar)?;
            }
            0
        }
        Commands::Stats { out_csv } => {
            if plan.schedule.is_empty() {
                bail!("no schedule saved: run `plan` first");
            }
            let allocation = Allocation::replay(&plan.roster.staff, plan.schedule.clone());
            let report = StatisticsReport::compute(&allocation);
            print_report(&report, &plan.roster.staff);
            if let Some(path) = out_csv {
                io::export_statistics_csv(path, &report)?;
            }
            0
        }
    };

    std::process::exit(code);
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

fn print_schedule(schedule: &Schedule, calendar: &CalendarPolicy) {
    for (date, day) in schedule.iter() {
        let marker = if calendar.is_sunday(*date) { " *" } else { "" };
        if day.is_empty() {
            println!("{} {}{} | -", date, date.weekday(), marker);
            continue;
        }
        let entries: Vec<String> = day
            .iter()
            .map(|(member, shift)| {
                format!(
                    "{}: {} ({}-{})",
                    member,
                    shift.name(),
                    shift.start_label(),
                    shift.end_label()
                )
            })
            .collect();
        println!("{} {}{} | {}", date, date.weekday(), marker, entries.join(" | "));
    }
}

fn print_report(report: &StatisticsReport, staff: &[StaffMember]) {
    for m in &report.members {
        let weeks: Vec<String> = m
            .weekly_hours
            .iter()
            .map(|(w, h)| format!("W{w}={h}h"))
            .collect();
        println!(
            "{} | total {}h | {} day(s) | {} sunday(s) | {}",
            m.name,
            m.total_hours,
            m.days_worked,
            m.sunday_shifts,
            weeks.join(" ")
        );
        if let Some(member) = staff.iter().find(|s| s.name() == m.name) {
            println!(
                "  average {:.1}h/week (contract: {}h min, {}h max)",
                m.average_weekly_hours,
                member.min_weekly_hours(),
                member.max_weekly_hours()
            );
        }
        if !m.weeks_below_minimum.is_empty() {
            let short: Vec<String> = m.weeks_below_minimum.iter().map(|w| w.to_string()).collect();
            println!("  below minimum in week(s): {}", short.join(","));
        }
    }
    println!("Sunday shifts: {}", report.sunday_shifts_total);
}
