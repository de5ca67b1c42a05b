//! Warehouse table definitions.
//!
//! One DDL statement per table, executed idempotently on startup.
//! Columns mirror what the fitness providers return; no provider-specific
//! parsing lives in this crate.

use rusqlite::Connection;

const ATHLETE: &str = r#"
CREATE TABLE IF NOT EXISTS athlete (
    athlete_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    birthday TEXT,
    sex TEXT,
    min_non_warmup_workout_time INTEGER,
    weekly_tss_goal INTEGER,
    rr_max_goal INTEGER,
    rr_min_goal INTEGER,
    weekly_workout_goal INTEGER,
    weekly_yoga_goal INTEGER,
    weekly_sleep_score_goal INTEGER,
    weekly_readiness_score_goal INTEGER,
    weekly_activity_score_goal INTEGER,
    daily_sleep_hr_target INTEGER,
    ftp_test_notification_week_threshold INTEGER,
    cycle_power_zone_threshold_1 REAL,
    cycle_power_zone_threshold_2 REAL,
    cycle_power_zone_threshold_3 REAL,
    cycle_power_zone_threshold_4 REAL,
    cycle_power_zone_threshold_5 REAL,
    cycle_power_zone_threshold_6 REAL,
    run_power_zone_threshold_1 REAL,
    run_power_zone_threshold_2 REAL,
    run_power_zone_threshold_3 REAL,
    run_power_zone_threshold_4 REAL,
    hr_zone_threshold_1 REAL,
    hr_zone_threshold_2 REAL,
    hr_zone_threshold_3 REAL,
    hr_zone_threshold_4 REAL
)
"#;

const HRV_WORKOUT_STEP_LOG: &str = r#"
CREATE TABLE IF NOT EXISTS hrv_workout_step_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    athlete_id INTEGER,
    date TEXT,
    hrv_workout_step INTEGER,
    hrv_workout_step_desc TEXT,
    completed INTEGER DEFAULT 0,
    rationale TEXT
)
"#;

const ANNOTATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS annotations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    athlete_id INTEGER,
    date TEXT,
    annotation TEXT
)
"#;

const STRAVA_SAMPLES: &str = r#"
CREATE TABLE IF NOT EXISTS strava_samples (
    timestamp_local TEXT PRIMARY KEY,
    time_interval TEXT,
    activity_id INTEGER,
    date TEXT,
    type TEXT,
    act_name TEXT,
    athlete_id INTEGER,
    distance REAL,
    velocity_smooth REAL,
    temp REAL,
    altitude REAL,
    latitude REAL,
    longitude REAL,
    heartrate INTEGER,
    cadence INTEGER,
    watts INTEGER,
    moving INTEGER,
    grade_smooth REAL,
    ftp REAL,
    time INTEGER,
    power_zone INTEGER,
    hr_zone INTEGER,
    hr_lowest INTEGER
)
"#;

const STRAVA_BEST_SAMPLES: &str = r#"
CREATE TABLE IF NOT EXISTS strava_best_samples (
    activity_id INTEGER NOT NULL,
    interval INTEGER NOT NULL,
    mmp REAL,
    watts_per_kg REAL,
    timestamp_local TEXT,
    time_interval TEXT,
    type TEXT,
    date TEXT,
    act_name TEXT,
    athlete_id INTEGER,
    PRIMARY KEY (activity_id, interval)
)
"#;

const STRAVA_SUMMARY: &str = r#"
CREATE TABLE IF NOT EXISTS strava_summary (
    start_date_utc TEXT PRIMARY KEY,
    activity_id INTEGER,
    athlete_id INTEGER,
    name TEXT,
    distance REAL,
    moving_time INTEGER,
    elapsed_time INTEGER,
    total_elevation_gain INTEGER,
    type TEXT,
    start_date_local TEXT,
    start_day_local TEXT,
    timezone TEXT,
    start_lat TEXT,
    start_lon TEXT,
    end_lat TEXT,
    end_lon TEXT,
    location_city TEXT,
    location_state TEXT,
    location_country TEXT,
    average_speed REAL,
    max_speed REAL,
    average_watts REAL,
    max_watts REAL,
    average_heartrate REAL,
    max_heartrate REAL,
    kilojoules REAL,
    device_name TEXT,
    calories REAL,
    description TEXT,
    pr_count INTEGER,
    achievement_count INTEGER,
    commute INTEGER,
    trainer INTEGER,
    gear_id TEXT,
    ftp REAL,
    weighted_average_power REAL,
    relative_intensity REAL,
    efficiency_factor REAL,
    tss REAL,
    hrss REAL,
    variability_index REAL,
    trimp REAL,
    low_intensity_seconds INTEGER,
    med_intensity_seconds INTEGER,
    high_intensity_seconds INTEGER,
    weight REAL
)
"#;

const OURA_READINESS_SUMMARY: &str = r#"
CREATE TABLE IF NOT EXISTS oura_readiness_summary (
    report_date TEXT PRIMARY KEY,
    summary_date TEXT,
    score INTEGER,
    period_id INTEGER,
    score_activity_balance INTEGER,
    score_previous_day INTEGER,
    score_previous_night INTEGER,
    score_recovery_index INTEGER,
    score_resting_hr INTEGER,
    score_sleep_balance INTEGER,
    score_temperature INTEGER,
    score_hrv_balance INTEGER
)
"#;

const OURA_ACTIVITY_SUMMARY: &str = r#"
CREATE TABLE IF NOT EXISTS oura_activity_summary (
    summary_date TEXT PRIMARY KEY,
    average_met REAL,
    cal_active INTEGER,
    cal_total INTEGER,
    class_5min TEXT,
    daily_movement INTEGER,
    day_end_local TEXT,
    day_start_local TEXT,
    high INTEGER,
    inactive INTEGER,
    inactivity_alerts INTEGER,
    low INTEGER,
    medium INTEGER,
    met_min_high INTEGER,
    met_min_inactive INTEGER,
    met_min_low INTEGER,
    met_min_medium INTEGER,
    non_wear INTEGER,
    rest INTEGER,
    score INTEGER,
    score_meet_daily_targets INTEGER,
    score_move_every_hour INTEGER,
    score_recovery_time INTEGER,
    score_stay_active INTEGER,
    score_training_frequency INTEGER,
    score_training_volume INTEGER,
    steps INTEGER,
    target_calories INTEGER,
    timezone INTEGER,
    target_km REAL,
    target_miles REAL,
    to_target_km REAL,
    to_target_miles REAL,
    total INTEGER
)
"#;

const OURA_ACTIVITY_SAMPLES: &str = r#"
CREATE TABLE IF NOT EXISTS oura_activity_samples (
    timestamp_local TEXT PRIMARY KEY,
    summary_date TEXT,
    met_1min REAL,
    class_5min INTEGER,
    class_5min_desc TEXT
)
"#;

const OURA_SLEEP_SUMMARY: &str = r#"
CREATE TABLE IF NOT EXISTS oura_sleep_summary (
    report_date TEXT PRIMARY KEY,
    summary_date TEXT,
    awake INTEGER,
    bedtime_end_local TEXT,
    bedtime_end_delta INTEGER,
    bedtime_start_local TEXT,
    bedtime_start_delta INTEGER,
    breath_average REAL,
    deep INTEGER,
    duration INTEGER,
    efficiency INTEGER,
    hr_average REAL,
    hr_lowest INTEGER,
    hypnogram_5min TEXT,
    is_longest INTEGER,
    light INTEGER,
    midpoint_at_delta INTEGER,
    midpoint_time INTEGER,
    onset_latency INTEGER,
    period_id INTEGER,
    rem INTEGER,
    restless INTEGER,
    rmssd INTEGER,
    score INTEGER,
    score_alignment INTEGER,
    score_deep INTEGER,
    score_disturbances INTEGER,
    score_efficiency INTEGER,
    score_latency INTEGER,
    score_rem INTEGER,
    score_total INTEGER,
    temperature_delta REAL,
    temperature_deviation REAL,
    temperature_trend_deviation REAL,
    timezone INTEGER,
    total INTEGER
)
"#;

const OURA_SLEEP_SAMPLES: &str = r#"
CREATE TABLE IF NOT EXISTS oura_sleep_samples (
    timestamp_local TEXT PRIMARY KEY,
    summary_date TEXT,
    report_date TEXT,
    rmssd_5min INTEGER,
    hr_5min INTEGER,
    hypnogram_5min INTEGER,
    hypnogram_5min_desc TEXT
)
"#;

const API_TOKENS: &str = r#"
CREATE TABLE IF NOT EXISTS api_tokens (
    date_utc TEXT NOT NULL,
    service TEXT NOT NULL UNIQUE,
    tokens TEXT NOT NULL,
    nonce TEXT NOT NULL
)
"#;

const DB_REFRESH: &str = r#"
CREATE TABLE IF NOT EXISTS db_refresh (
    timestamp_utc TEXT PRIMARY KEY,
    process TEXT,
    truncate INTEGER DEFAULT 0,
    oura_status TEXT,
    strava_status TEXT,
    withings_status TEXT,
    fitbod_status TEXT
)
"#;

const WITHINGS: &str = r#"
CREATE TABLE IF NOT EXISTS withings (
    date_utc TEXT PRIMARY KEY,
    weight REAL,
    fat_ratio REAL,
    hydration REAL
)
"#;

const FITBOD: &str = r#"
CREATE TABLE IF NOT EXISTS fitbod (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date_utc TEXT,
    exercise TEXT,
    reps INTEGER,
    weight INTEGER,
    duration INTEGER,
    is_warmup INTEGER,
    note TEXT,
    one_rep_max REAL,
    weight_duration_max REAL
)
"#;

const FITBOD_MUSCLES: &str = r#"
CREATE TABLE IF NOT EXISTS fitbod_muscles (
    exercise TEXT PRIMARY KEY,
    muscle TEXT
)
"#;

/// All warehouse tables, in creation order.
pub const TABLES: &[(&str, &str)] = &[
    ("athlete", ATHLETE),
    ("hrv_workout_step_log", HRV_WORKOUT_STEP_LOG),
    ("annotations", ANNOTATIONS),
    ("strava_samples", STRAVA_SAMPLES),
    ("strava_best_samples", STRAVA_BEST_SAMPLES),
    ("strava_summary", STRAVA_SUMMARY),
    ("oura_readiness_summary", OURA_READINESS_SUMMARY),
    ("oura_activity_summary", OURA_ACTIVITY_SUMMARY),
    ("oura_activity_samples", OURA_ACTIVITY_SAMPLES),
    ("oura_sleep_summary", OURA_SLEEP_SUMMARY),
    ("oura_sleep_samples", OURA_SLEEP_SAMPLES),
    ("api_tokens", API_TOKENS),
    ("db_refresh", DB_REFRESH),
    ("withings", WITHINGS),
    ("fitbod", FITBOD),
    ("fitbod_muscles", FITBOD_MUSCLES),
];

/// Create every table if it does not already exist.
pub fn create_all(conn: &Connection) -> rusqlite::Result<()> {
    for (_, ddl) in TABLES {
        conn.execute_batch(ddl)?;
    }
    Ok(())
}

/// Returns true if `name` is a warehouse table.
pub fn is_known_table(name: &str) -> bool {
    TABLES.iter().any(|(table, _)| *table == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_all_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_all(&conn).unwrap();
        create_all(&conn).unwrap();
    }

    #[test]
    fn test_all_tables_exist_after_create() {
        let conn = Connection::open_in_memory().unwrap();
        create_all(&conn).unwrap();

        for (table, _) in TABLES {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "table '{}' missing", table);
        }
    }

    #[test]
    fn test_is_known_table() {
        assert!(is_known_table("api_tokens"));
        assert!(is_known_table("strava_summary"));
        assert!(!is_known_table("nonexistent"));
        assert!(!is_known_table(""));
    }
}
