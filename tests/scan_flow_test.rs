//! Profile + scan flow against an in-memory database

use chrono::{Duration, Utc};
use fitcommit::config::Config;
use fitcommit::profile::Profile;
use fitcommit::progress::{ChartAxis, HistoryReport, MilestoneKind, Period, ProgressPoint, find_milestones};
use fitcommit::scan::{AnalyzeImagesRequest, parse_analysis_response};
use fitcommit::Database;

fn setup(activity: &str) -> Database {
    let db = Database::open(":memory:").unwrap();
    let profile = Profile {
        weight_kg: Some(80.0),
        height_cm: Some(180.0),
        activity_level: Some(activity.to_string()),
        exercise_frequency: Some("3-4".to_string()),
        ..Profile::new("local")
    };
    db.upsert_profile(&profile).unwrap();
    db
}

#[test]
fn test_scan_from_service_response_updates_profile() {
    let db = setup("Heavy Exercise (6-7 days/week)");
    let config = Config::default();

    let response = parse_analysis_response(
        r#"{"bodyFat": "Your body fat is approximately 20%", "rationale": "defined shoulders"}"#,
    )
    .unwrap();
    let point = ProgressPoint {
        body_fat: response.body_fat_percentage().unwrap(),
        timestamp: Utc::now(),
        analysis: response.rationale,
    };

    let outcome = db.record_scan("local", &point, &[], &config).unwrap();
    let breakdown = outcome.breakdown.unwrap();
    assert!((breakdown.tdee - 2891.46).abs() < 1e-6);

    let stored = db.get_profile("local").unwrap().unwrap();
    assert_eq!(stored.tdee_tdee.as_deref(), Some("2891"));
    assert_eq!(stored.bmi_bmi.as_deref(), Some("24.69"));

    let history = db.get_progress_history("local").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].analysis.as_deref(), Some("defined shoulders"));
}

#[test]
fn test_tdee_follows_latest_scan() {
    let db = setup("sedentary");
    let config = Config::default();
    let now = Utc::now();

    db.record_scan("local", &ProgressPoint::new(25.0, now - Duration::days(30)), &[], &config)
        .unwrap();
    let first = db.get_profile("local").unwrap().unwrap().tdee_kcal().unwrap();

    db.record_scan("local", &ProgressPoint::new(19.0, now), &[], &config).unwrap();
    let second = db.get_profile("local").unwrap().unwrap().tdee_kcal().unwrap();

    // Less fat at the same weight means more lean mass
    assert!(second > first, "{} should exceed {}", second, first);
}

#[test]
fn test_history_chart_and_milestones() {
    let db = setup("sedentary");
    let config = Config { target_body_fat: 14.0, ..Config::default() };
    let now = Utc::now();

    for (days_ago, bf) in [(60, 21.0), (30, 17.5), (0, 14.0)] {
        db.record_scan("local", &ProgressPoint::new(bf, now - Duration::days(days_ago)), &[], &config)
            .unwrap();
    }

    let history = db.get_progress_history("local").unwrap();
    let axis = ChartAxis::for_history(&history);
    assert_eq!((axis.min, axis.max), (13.0, 22.0));
    assert_eq!(axis.ticks().len(), 7);

    let milestones = find_milestones(&history, config.target_body_fat);
    let kinds: Vec<_> = milestones.iter().map(|m| (m.index, m.kind)).collect();
    assert_eq!(kinds, vec![(2, MilestoneKind::Reduction), (2, MilestoneKind::Goal)]);
}

#[test]
fn test_check_in_keeps_photos_and_metrics() {
    let db = setup("sedentary");
    let config = Config::default();
    let request = AnalyzeImagesRequest::new("f.jpg", "s.jpg", "b.jpg");

    let response = parse_analysis_response(r#"{"bodyFat": "about 25", "rationale": "early days"}"#).unwrap();
    let point = ProgressPoint {
        body_fat: response.body_fat_percentage().unwrap(),
        timestamp: Utc::now(),
        analysis: response.rationale,
    };
    db.record_scan("local", &point, &request.images, &config).unwrap();

    let scans = db.get_body_scans("local").unwrap();
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].side_image_url.as_deref(), Some("s.jpg"));
    assert_eq!(scans[0].analysis_body_fat, 25.0);
    // 370 + 21.6 * 60 = 1666, x (1.2 + 0.10)
    assert_eq!(scans[0].tdee.as_deref(), Some("2166"));
    assert_eq!(scans[0].bmi.as_deref(), Some("24.69"));
}

#[test]
fn test_history_period_window() {
    let db = setup("sedentary");
    let config = Config { target_body_fat: 14.0, ..Config::default() };
    let now = Utc::now();

    for (days_ago, bf) in [(200, 26.0), (60, 21.0), (5, 14.0)] {
        db.record_scan("local", &ProgressPoint::new(bf, now - Duration::days(days_ago)), &[], &config)
            .unwrap();
    }
    let history = db.get_progress_history("local").unwrap();

    let week = HistoryReport::new(&history, Period::Week, config.target_body_fat, now);
    assert_eq!(week.points.len(), 1);
    assert!(week.milestones.is_empty());

    let quarter = HistoryReport::new(&history, Period::ThreeMonths, config.target_body_fat, now);
    assert_eq!(quarter.points.len(), 2);
    let kinds: Vec<_> = quarter.milestones.iter().map(|m| m.kind).collect();
    assert_eq!(kinds, vec![MilestoneKind::Reduction, MilestoneKind::Goal]);

    assert_eq!(HistoryReport::new(&history, Period::All, 14.0, now).points.len(), 3);
}
