use crate::calendar::CalendarPolicy;
use crate::model::{ShiftType, StaffMember};
use crate::planner::Schedule;
use crate::stats::StatisticsReport;
use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate, Weekday};
use csv::{ReaderBuilder, Writer, WriterBuilder};
use std::path::Path;

/// Import du personnel depuis CSV :
/// header `name,min_weekly_hours,max_weekly_hours[,overtime_allowed][,rest_days][,absences]`.
///
/// `rest_days` et `absences` sont séparés par `;` (indices 0-6 ou noms de jours, dates `YYYY-MM-DD`).
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StaffMember>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid staff row (empty name)");
        }
        let min: f64 = rec
            .get(1)
            .context("missing min_weekly_hours")?
            .trim()
            .parse()
            .with_context(|| format!("invalid min_weekly_hours for {name}"))?;
        let max: f64 = rec
            .get(2)
            .context("missing max_weekly_hours")?
            .trim()
            .parse()
            .with_context(|| format!("invalid max_weekly_hours for {name}"))?;
        let overtime = match rec.get(3).map(str::trim) {
            Some(flag) if !flag.is_empty() => parse_bool(flag)
                .with_context(|| format!("invalid overtime_allowed value for {name}"))?,
            _ => false,
        };
        let mut member = StaffMember::new(name, min, max, overtime)
            .with_context(|| format!("invalid staff row {name}"))?;
        if let Some(days) = rec.get(4) {
            for raw in list_items(days) {
                let day = parse_weekday(raw)
                    .with_context(|| format!("invalid rest day for {name}"))?;
                member.add_rest_day(day)?;
            }
        }
        if let Some(dates) = rec.get(5) {
            for raw in list_items(dates) {
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .with_context(|| format!("invalid absence date {raw} for {name}"))?;
                member.add_absence(date);
            }
        }
        out.push(member);
    }
    Ok(out)
}

/// Import des turni : header `name,start,end` (`HH:MM`).
pub fn import_shifts_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ShiftType>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let start = rec.get(1).context("missing start")?;
        let end = rec.get(2).context("missing end")?;
        let shift = ShiftType::new(name, start, end)
            .with_context(|| format!("invalid shift row {name}"))?;
        out.push(shift);
    }
    Ok(out)
}

fn list_items(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';').map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "si" | "sì" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Indice 0 (lundi) à 6 (dimanche), ou nom anglais du jour (`mon`, `sunday`...).
pub fn parse_weekday(raw: &str) -> anyhow::Result<u8> {
    let raw = raw.trim();
    if let Ok(idx) = raw.parse::<u8>() {
        if idx > 6 {
            bail!("weekday index out of range: {idx}");
        }
        return Ok(idx);
    }
    let day: Weekday = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown weekday: {raw}"))?;
    Ok(day.num_days_from_monday() as u8)
}

/// Écrit le planning : header `date,weekday,day_kind,member,shift,start,end,hours`.
///
/// Un jour sans affectation produit une ligne avec `-` comme membre.
pub fn write_schedule_csv<W: std::io::Write>(
    writer: W,
    schedule: &Schedule,
    calendar: &CalendarPolicy,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    w.write_record([
        "date", "weekday", "day_kind", "member", "shift", "start", "end", "hours",
    ])?;
    for (date, day) in schedule.iter() {
        let date_s = date.to_string();
        let weekday = date.weekday().to_string();
        let kind = calendar.day_kind(*date).as_str();
        if day.is_empty() {
            w.write_record([date_s.as_str(), weekday.as_str(), kind, "-", "", "", "", ""])?;
            continue;
        }
        for (member, shift) in day {
            w.write_record([
                date_s.as_str(),
                weekday.as_str(),
                kind,
                member.as_str(),
                shift.name(),
                shift.start_label().as_str(),
                shift.end_label().as_str(),
                shift.duration_hours().to_string().as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

pub fn export_schedule_csv<P: AsRef<Path>>(
    path: P,
    schedule: &Schedule,
    calendar: &CalendarPolicy,
) -> anyhow::Result<()> {
    let file = std::fs::File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    write_schedule_csv(file, schedule, calendar)
}

/// Statistiques : header
/// `member,total_hours,average_weekly_hours,days_worked,sunday_shifts,weeks_below_minimum`.
pub fn write_statistics_csv<W: std::io::Write>(
    writer: W,
    report: &StatisticsReport,
) -> anyhow::Result<()> {
    let mut w = Writer::from_writer(writer);
    w.write_record([
        "member",
        "total_hours",
        "average_weekly_hours",
        "days_worked",
        "sunday_shifts",
        "weeks_below_minimum",
    ])?;
    for m in &report.members {
        let weeks = m
            .weeks_below_minimum
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join(";");
        w.write_record([
            m.name.clone(),
            m.total_hours.to_string(),
            format!("{:.1}", m.average_weekly_hours),
            m.days_worked.to_string(),
            m.sunday_shifts.to_string(),
            weeks,
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_statistics_csv<P: AsRef<Path>>(
    path: P,
    report: &StatisticsReport,
) -> anyhow::Result<()> {
    let file = std::fs::File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    write_statistics_csv(file, report)
}

/// Personnel et contraintes, relisible par [`import_staff_csv`] :
/// header `name,min_weekly_hours,max_weekly_hours,overtime_allowed,rest_days,absences`.
pub fn write_staff_csv<W: std::io::Write>(writer: W, staff: &[StaffMember]) -> anyhow::Result<()> {
    let mut w = Writer::from_writer(writer);
    w.write_record([
        "name",
        "min_weekly_hours",
        "max_weekly_hours",
        "overtime_allowed",
        "rest_days",
        "absences",
    ])?;
    for m in staff {
        let rest = m
            .rest_weekdays()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(";");
        let absences = m
            .absences()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(";");
        w.write_record([
            m.name().to_string(),
            m.min_weekly_hours().to_string(),
            m.max_weekly_hours().to_string(),
            m.overtime_allowed().to_string(),
            rest,
            absences,
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_staff_csv<P: AsRef<Path>>(path: P, staff: &[StaffMember]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    write_staff_csv(file, staff)
}
