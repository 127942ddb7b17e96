//! Database module - SQLite storage for profiles and body-fat progress

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::profile::Profile;
use crate::progress::{ProgressPoint, latest_body_fat};
use crate::tdee::{self, TdeeBreakdown};

/// Stored check-in: photos, analysis and the metrics at scan time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyScan {
    pub id: i64,
    pub front_image_url: Option<String>,
    pub side_image_url: Option<String>,
    pub back_image_url: Option<String>,
    pub analysis_rationale: Option<String>,
    pub analysis_body_fat: f64,
    pub scanned_at: DateTime<Utc>,
    /// BMI with two decimals
    pub bmi: Option<String>,
    /// TDEE from this scan's body fat, rounded kcal
    pub tdee: Option<String>,
}

/// Result of recording a body scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub point_id: i64,
    pub scan_id: i64,
    pub body_fat: f64,
    /// `None` when the profile has no weight yet
    pub breakdown: Option<TdeeBreakdown>,
    pub profile: Profile,
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database (":memory:" for a throwaway one)
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path))?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                name TEXT,
                age INTEGER,
                gender TEXT,
                height_cm REAL,
                weight_kg REAL,
                activity_level TEXT,
                exercise_frequency TEXT,
                bmi_bmi TEXT,
                tdee_tdee TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS progress_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                body_fat REAL NOT NULL,
                timestamp TEXT NOT NULL,
                analysis TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS body_scans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                front_image_url TEXT,
                side_image_url TEXT,
                back_image_url TEXT,
                analysis_rationale TEXT,
                analysis_body_fat REAL NOT NULL,
                scanned_at TEXT NOT NULL,
                bmi TEXT,
                tdee TEXT
            )",
            [],
        )?;

        Ok(())
    }

    /// Insert or replace a profile
    pub fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        self.conn.execute(
            "INSERT INTO profiles (id, name, age, gender, height_cm, weight_kg, activity_level, exercise_frequency, bmi_bmi, tdee_tdee)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                gender = excluded.gender,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                activity_level = excluded.activity_level,
                exercise_frequency = excluded.exercise_frequency,
                bmi_bmi = excluded.bmi_bmi,
                tdee_tdee = excluded.tdee_tdee",
            params![
                profile.id,
                profile.name,
                profile.age,
                profile.gender.map(|g| g.as_str()),
                profile.height_cm,
                profile.weight_kg,
                profile.activity_level,
                profile.exercise_frequency,
                profile.bmi_bmi,
                profile.tdee_tdee,
            ],
        )?;
        debug!(user_id = %profile.id, "Profile saved");
        Ok(())
    }

    pub fn get_profile(&self, id: &str) -> Result<Option<Profile>> {
        let profile = self.conn
            .query_row(
                "SELECT id, name, age, gender, height_cm, weight_kg, activity_level, exercise_frequency, bmi_bmi, tdee_tdee
                 FROM profiles WHERE id = ?1",
                params![id],
                row_to_profile,
            )
            .optional()?;
        Ok(profile)
    }

    pub fn update_activity_level(&self, id: &str, activity_level: &str) -> Result<()> {
        self.update_column(id, "activity_level", activity_level)
    }

    pub fn update_exercise_frequency(&self, id: &str, exercise_frequency: &str) -> Result<()> {
        self.update_column(id, "exercise_frequency", exercise_frequency)
    }

    fn update_column(&self, id: &str, column: &'static str, value: &str) -> Result<()> {
        let sql = format!("UPDATE profiles SET {} = ?1 WHERE id = ?2", column);
        let changed = self.conn.execute(&sql, params![value, id])?;
        if changed == 0 {
            bail!("Profile not found: {}", id);
        }
        Ok(())
    }

    /// Persist derived BMI/TDEE strings
    pub fn update_metrics(&self, id: &str, bmi: Option<&str>, tdee: Option<&str>) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE profiles SET bmi_bmi = ?1, tdee_tdee = ?2 WHERE id = ?3",
            params![bmi, tdee, id],
        )?;
        if changed == 0 {
            bail!("Profile not found: {}", id);
        }
        Ok(())
    }

    /// Add a body-fat measurement
    pub fn add_progress_point(&self, user_id: &str, point: &ProgressPoint) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO progress_history (user_id, body_fat, timestamp, analysis) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, point.body_fat, point.timestamp.to_rfc3339(), point.analysis],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Progress history, oldest first
    pub fn get_progress_history(&self, user_id: &str) -> Result<Vec<ProgressPoint>> {
        let mut stmt = self.conn.prepare(
            "SELECT body_fat, timestamp, analysis FROM progress_history WHERE user_id = ?1 ORDER BY timestamp ASC, id ASC"
        )?;

        let history = stmt.query_map(params![user_id], |row| {
            let timestamp: String = row.get(1)?;
            Ok(ProgressPoint {
                body_fat: row.get(0)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp)
                    .map(|d| d.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
                analysis: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }

    /// Check-ins with their metric snapshots, oldest first
    pub fn get_body_scans(&self, user_id: &str) -> Result<Vec<BodyScan>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, front_image_url, side_image_url, back_image_url, analysis_rationale,
                    analysis_body_fat, scanned_at, bmi, tdee
             FROM body_scans WHERE user_id = ?1 ORDER BY scanned_at ASC, id ASC"
        )?;

        let scans = stmt.query_map(params![user_id], |row| {
            let scanned_at: String = row.get(6)?;
            Ok(BodyScan {
                id: row.get(0)?,
                front_image_url: row.get(1)?,
                side_image_url: row.get(2)?,
                back_image_url: row.get(3)?,
                analysis_rationale: row.get(4)?,
                analysis_body_fat: row.get(5)?,
                scanned_at: DateTime::parse_from_rfc3339(&scanned_at)
                    .map(|d| d.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
                bmi: row.get(7)?,
                tdee: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

        Ok(scans)
    }

    fn add_body_scan(
        &self,
        user_id: &str,
        point: &ProgressPoint,
        images: &[String],
        bmi: Option<&str>,
        tdee: Option<&str>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO body_scans (user_id, front_image_url, side_image_url, back_image_url,
                                     analysis_rationale, analysis_body_fat, scanned_at, bmi, tdee)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user_id,
                images.first(),
                images.get(1),
                images.get(2),
                point.analysis,
                point.body_fat,
                point.timestamp.to_rfc3339(),
                bmi,
                tdee,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Store a scan, then recompute and persist the profile's BMI/TDEE.
    ///
    /// `images` are the front, side and back photo URLs, if any. All writes
    /// happen in one transaction.
    pub fn record_scan(
        &self,
        user_id: &str,
        point: &ProgressPoint,
        images: &[String],
        config: &Config,
    ) -> Result<ScanOutcome> {
        if !point.body_fat.is_finite() || point.body_fat <= 0.0 || point.body_fat >= 100.0 {
            bail!("Body fat out of range: {}", point.body_fat);
        }
        let mut profile = self
            .get_profile(user_id)?
            .with_context(|| format!("Profile not found: {} (run `fitcommit profile set` first)", user_id))?;

        let tx = self.conn.unchecked_transaction()?;

        let point_id = self.add_progress_point(user_id, point)?;
        let history = self.get_progress_history(user_id)?;
        let breakdown = profile.refresh_metrics(latest_body_fat(&history), config);
        self.update_metrics(user_id, profile.bmi_bmi.as_deref(), profile.tdee_tdee.as_deref())?;

        // Snapshot uses this scan's body fat, which may not be the latest
        let scan_tdee = profile
            .tdee_inputs(Some(point.body_fat), config)
            .map(|inputs| tdee::estimate(&inputs).rounded().to_string());
        let scan_id = self.add_body_scan(user_id, point, images, profile.bmi_bmi.as_deref(), scan_tdee.as_deref())?;

        tx.commit()?;

        info!(user_id, body_fat = point.body_fat, point_id, scan_id, "Scan recorded");
        Ok(ScanOutcome { point_id, scan_id, body_fat: point.body_fat, breakdown, profile })
    }
}

fn row_to_profile(row: &Row<'_>) -> rusqlite::Result<Profile> {
    let gender: Option<String> = row.get(3)?;
    Ok(Profile {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: gender.and_then(|g| g.parse().ok()),
        height_cm: row.get(4)?,
        weight_kg: row.get(5)?,
        activity_level: row.get(6)?,
        exercise_frequency: row.get(7)?,
        bmi_bmi: row.get(8)?,
        tdee_tdee: row.get(9)?,
    })
}
