#![forbid(unsafe_code)]
use chrono::NaiveDate;
use turni::{io, Allocation, CalendarPolicy, Schedule, ShiftType, StaffMember, StatisticsReport};

fn small_schedule() -> Schedule {
    let morning = ShiftType::new("Mattina", "08:00", "14:00").unwrap();
    let night = ShiftType::new("Notte", "22:00", "06:00").unwrap();
    let sunday = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
    let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();

    let mut schedule = Schedule::new();
    schedule.assign(sunday, "Bruno", night);
    schedule.assign(sunday, "Anna", morning);
    schedule.open_day(monday);
    schedule
}

#[test]
fn schedule_csv_layout() {
    let mut out = Vec::new();
    io::write_schedule_csv(&mut out, &small_schedule(), &CalendarPolicy::new()).unwrap();
    let csv = String::from_utf8(out).unwrap();

    insta::assert_snapshot!(csv, @r"
    date,weekday,day_kind,member,shift,start,end,hours
    2025-01-05,Sun,sunday,Anna,Mattina,08:00,14:00,6
    2025-01-05,Sun,sunday,Bruno,Notte,22:00,06:00,8
    2025-01-06,Mon,ordinary,-,,,,
    ");
}

#[test]
fn statistics_csv_layout() {
    let staff = vec![
        StaffMember::new("Anna", 12.0, 40.0, false).unwrap(),
        StaffMember::new("Bruno", 0.0, 40.0, true).unwrap(),
        // aucun turno : les totaux doivent rester à 0, jamais -0
        StaffMember::new("Carla", 0.0, 40.0, false).unwrap(),
    ];
    let report = StatisticsReport::compute(&Allocation::replay(&staff, small_schedule()));

    let mut out = Vec::new();
    io::write_statistics_csv(&mut out, &report).unwrap();
    let csv = String::from_utf8(out).unwrap();

    insta::assert_snapshot!(csv, @r"
    member,total_hours,average_weekly_hours,days_worked,sunday_shifts,weeks_below_minimum
    Anna,6,6.0,1,1,1;2
    Bruno,8,8.0,1,1,
    Carla,0,0.0,0,0,
    ");
    assert_eq!(report.total_hours(), 14.0);
}

#[test]
fn staff_csv_layout_reimports() {
    let staff = vec![
        StaffMember::new("Anna", 12.0, 37.5, false)
            .unwrap()
            .with_rest_day(6)
            .unwrap()
            .with_rest_day(0)
            .unwrap()
            .with_absence(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
            .with_absence(NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()),
        StaffMember::new("Bruno", 0.0, 40.0, true).unwrap(),
    ];

    let mut out = Vec::new();
    io::write_staff_csv(&mut out, &staff).unwrap();
    let csv = String::from_utf8(out).unwrap();

    insta::assert_snapshot!(csv, @r"
    name,min_weekly_hours,max_weekly_hours,overtime_allowed,rest_days,absences
    Anna,12,37.5,false,0;6,2025-01-15;2025-01-16
    Bruno,0,40,true,,
    ");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staff.csv");
    io::export_staff_csv(&path, &staff).unwrap();
    assert_eq!(io::import_staff_csv(&path).unwrap(), staff);
}
