//! Configuration tables: meeting situations, speed classes, encounter stages,
//! and safety thresholds.
//!
//! Tables load from a JSON document with per-record validation: a malformed
//! or out-of-range record is rejected individually and produces a diagnostic,
//! and the built-in default table is used only when no valid record survives.
//! The loaded [`GeneratorConfig`] is immutable and passed by reference into
//! the solver; there is no process-wide mutable configuration state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{INTER_TARGET_DCPA_NM, MIN_SEPARATION_NM, SAFE_DCPA_NM, SAFE_TCPA_MIN};
use crate::enums::{BearingFrame, ShipBehavior};
use crate::errors::ConfigError;

/// A named collision-situation template constraining a target's
/// relative-bearing and distance windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingSituation {
    pub id: u32,
    pub name: String,
    /// Relative-bearing window (degrees; `min > max` wraps through 0°).
    pub rel_brg_min: f64,
    pub rel_brg_max: f64,
    /// Distance window (nautical miles).
    pub dist_min: f64,
    pub dist_max: f64,
    /// Own-ship role in this situation.
    #[serde(default)]
    pub behavior: ShipBehavior,
    /// Frame the bearing window is expressed in. The overtaken entries of the
    /// built-in table are target-relative (Bt); the pending correction to the
    /// own-relative frame is carried here as data rather than applied.
    #[serde(default)]
    pub frame: BearingFrame,
}

impl MeetingSituation {
    fn validate(&self) -> Result<(), String> {
        for (name, v) in [
            ("rel_brg_min", self.rel_brg_min),
            ("rel_brg_max", self.rel_brg_max),
            ("dist_min", self.dist_min),
            ("dist_max", self.dist_max),
        ] {
            if !v.is_finite() {
                return Err(format!("{name} is not finite"));
            }
        }
        if self.name.is_empty() {
            return Err("name is empty".into());
        }
        if self.dist_min < 0.0 {
            return Err(format!("dist_min {} is negative", self.dist_min));
        }
        if self.dist_min > self.dist_max {
            return Err(format!(
                "dist_min {} exceeds dist_max {}",
                self.dist_min, self.dist_max
            ));
        }
        Ok(())
    }
}

/// A named telegraph-style speed band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedClass {
    pub id: u32,
    pub name: String,
    pub min_kn: f64,
    pub max_kn: f64,
}

impl SpeedClass {
    fn validate(&self) -> Result<(), String> {
        if !self.min_kn.is_finite() || !self.max_kn.is_finite() {
            return Err("speed bound is not finite".into());
        }
        if self.min_kn < 0.0 {
            return Err(format!("min_kn {} is negative", self.min_kn));
        }
        if self.min_kn > self.max_kn {
            return Err(format!(
                "min_kn {} exceeds max_kn {}",
                self.min_kn, self.max_kn
            ));
        }
        Ok(())
    }
}

/// A named encounter stage: the distance band a scenario is staged at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterStage {
    pub id: u32,
    pub name: String,
    pub dist_min: f64,
    pub dist_max: f64,
}

impl EncounterStage {
    fn validate(&self) -> Result<(), String> {
        if !self.dist_min.is_finite() || !self.dist_max.is_finite() {
            return Err("distance bound is not finite".into());
        }
        if self.dist_min < 0.0 {
            return Err(format!("dist_min {} is negative", self.dist_min));
        }
        if self.dist_min > self.dist_max {
            return Err(format!(
                "dist_min {} exceeds dist_max {}",
                self.dist_min, self.dist_max
            ));
        }
        Ok(())
    }
}

/// Externally configurable collision-risk thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyThresholds {
    /// Own-ship/target TCPA danger threshold (minutes).
    #[serde(default = "default_safe_tcpa")]
    pub safe_tcpa_min: f64,
    /// Own-ship/target DCPA danger threshold (nautical miles).
    #[serde(default = "default_safe_dcpa")]
    pub safe_dcpa_nm: f64,
    /// Target-to-target DCPA danger threshold (nautical miles).
    #[serde(default = "default_inter_target_dcpa")]
    pub inter_target_dcpa_nm: f64,
    /// Minimum pairwise separation between placed targets (nautical miles).
    #[serde(default = "default_min_separation")]
    pub min_separation_nm: f64,
}

fn default_safe_tcpa() -> f64 {
    SAFE_TCPA_MIN
}
fn default_safe_dcpa() -> f64 {
    SAFE_DCPA_NM
}
fn default_inter_target_dcpa() -> f64 {
    INTER_TARGET_DCPA_NM
}
fn default_min_separation() -> f64 {
    MIN_SEPARATION_NM
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            safe_tcpa_min: SAFE_TCPA_MIN,
            safe_dcpa_nm: SAFE_DCPA_NM,
            inter_target_dcpa_nm: INTER_TARGET_DCPA_NM,
            min_separation_nm: MIN_SEPARATION_NM,
        }
    }
}

impl SafetyThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("safe_tcpa_min", self.safe_tcpa_min),
            ("safe_dcpa_nm", self.safe_dcpa_nm),
            ("inter_target_dcpa_nm", self.inter_target_dcpa_nm),
            ("min_separation_nm", self.min_separation_nm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

/// Immutable aggregate of every configuration table, built once and passed
/// by reference into the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub thresholds: SafetyThresholds,
    pub situations: Vec<MeetingSituation>,
    pub speed_classes: Vec<SpeedClass>,
    pub stages: Vec<EncounterStage>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            thresholds: SafetyThresholds::default(),
            situations: default_meeting_situations(),
            speed_classes: default_speed_classes(),
            stages: default_stages(),
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a JSON document.
    ///
    /// Returns the accepted configuration and the diagnostics for every
    /// rejected record. Only a document that is not JSON at all is a hard
    /// error. Each table falls back to its built-in defaults when none of
    /// its records are valid (including when the table is absent).
    pub fn from_json_str(text: &str) -> Result<(Self, Vec<ConfigError>), ConfigError> {
        let doc: Value = serde_json::from_str(text)?;
        let mut diagnostics = Vec::new();

        let thresholds = match doc.get("thresholds") {
            Some(v) => match serde_json::from_value::<SafetyThresholds>(v.clone()) {
                Ok(t) => match t.validate() {
                    Ok(()) => t,
                    Err(e) => {
                        log::warn!("rejecting thresholds: {e}");
                        diagnostics.push(e);
                        SafetyThresholds::default()
                    }
                },
                Err(e) => {
                    let err = ConfigError::MalformedRecord {
                        table: "thresholds",
                        index: 0,
                        reason: e.to_string(),
                    };
                    log::warn!("{err}");
                    diagnostics.push(err);
                    SafetyThresholds::default()
                }
            },
            None => SafetyThresholds::default(),
        };

        let situations = load_table(
            &doc,
            "meeting_situations",
            MeetingSituation::validate,
            default_meeting_situations,
            &mut diagnostics,
        );
        let speed_classes = load_table(
            &doc,
            "speed_classes",
            SpeedClass::validate,
            default_speed_classes,
            &mut diagnostics,
        );
        let stages = load_table(
            &doc,
            "stages",
            EncounterStage::validate,
            default_stages,
            &mut diagnostics,
        );

        Ok((
            Self {
                thresholds,
                situations,
                speed_classes,
                stages,
            },
            diagnostics,
        ))
    }

    /// Look up a meeting situation by id.
    pub fn situation(&self, id: u32) -> Option<&MeetingSituation> {
        self.situations.iter().find(|m| m.id == id)
    }

    /// Look up a speed class by id.
    pub fn speed_class(&self, id: u32) -> Option<&SpeedClass> {
        self.speed_classes.iter().find(|s| s.id == id)
    }

    /// Look up an encounter stage by id.
    pub fn stage(&self, id: u32) -> Option<&EncounterStage> {
        self.stages.iter().find(|s| s.id == id)
    }
}

/// Parse and validate one table's records, keeping the valid ones and
/// pushing a diagnostic per rejected record. Falls back to `defaults` when
/// the table is absent or retains no valid record.
fn load_table<T>(
    doc: &Value,
    table: &'static str,
    validate: impl Fn(&T) -> Result<(), String>,
    defaults: impl Fn() -> Vec<T>,
    diagnostics: &mut Vec<ConfigError>,
) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    let rows = match doc.get(table).and_then(Value::as_array) {
        Some(rows) => rows,
        None => return defaults(),
    };

    let mut accepted = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match serde_json::from_value::<T>(row.clone()) {
            Ok(record) => match validate(&record) {
                Ok(()) => accepted.push(record),
                Err(reason) => {
                    let err = ConfigError::InvalidRecord {
                        table,
                        index,
                        reason,
                    };
                    log::warn!("{err}");
                    diagnostics.push(err);
                }
            },
            Err(e) => {
                let err = ConfigError::MalformedRecord {
                    table,
                    index,
                    reason: e.to_string(),
                };
                log::warn!("{err}");
                diagnostics.push(err);
            }
        }
    }

    if accepted.is_empty() {
        log::warn!("no valid `{table}` records, using built-in defaults");
        defaults()
    } else {
        accepted
    }
}

/// The built-in meeting-situation table.
///
/// Windows are own-relative except for the three overtaken entries, whose
/// windows are target-relative per the reference tables (see
/// [`BearingFrame::TargetRelative`]).
pub fn default_meeting_situations() -> Vec<MeetingSituation> {
    let row = |id, name: &str, brg: (f64, f64), dist: (f64, f64), behavior, frame| {
        MeetingSituation {
            id,
            name: name.to_string(),
            rel_brg_min: brg.0,
            rel_brg_max: brg.1,
            dist_min: dist.0,
            dist_max: dist.1,
            behavior,
            frame,
        }
    };
    use BearingFrame::{OwnRelative, TargetRelative};
    use ShipBehavior::{GiveWay, StandOn};

    vec![
        row(1, "head-on", (356.0, 6.0), (8.0, 14.0), StandOn, OwnRelative),
        row(
            2,
            "starboard fine crossing",
            (6.0, 67.5),
            (8.0, 14.0),
            StandOn,
            OwnRelative,
        ),
        row(
            3,
            "starboard broad crossing",
            (67.5, 112.5),
            (8.0, 14.0),
            StandOn,
            OwnRelative,
        ),
        row(
            4,
            "overtaking to port",
            (180.0, 247.5),
            (4.0, 7.0),
            StandOn,
            OwnRelative,
        ),
        row(
            5,
            "overtaking to starboard",
            (112.5, 180.0),
            (4.0, 7.0),
            StandOn,
            OwnRelative,
        ),
        row(
            6,
            "port fine crossing",
            (247.5, 292.5),
            (8.0, 14.0),
            GiveWay,
            OwnRelative,
        ),
        row(
            7,
            "port broad crossing",
            (292.5, 354.0),
            (8.0, 14.0),
            GiveWay,
            OwnRelative,
        ),
        row(
            8,
            "overtaken on port side",
            (112.5, 180.0),
            (4.0, 7.0),
            GiveWay,
            TargetRelative,
        ),
        row(
            9,
            "overtaken on starboard side",
            (180.0, 247.5),
            (4.0, 7.0),
            GiveWay,
            TargetRelative,
        ),
        row(
            10,
            "overtaken from astern",
            (180.0, 180.0),
            (4.0, 7.0),
            GiveWay,
            TargetRelative,
        ),
    ]
}

/// The built-in telegraph speed bands.
pub fn default_speed_classes() -> Vec<SpeedClass> {
    let row = |id, name: &str, min_kn, max_kn| SpeedClass {
        id,
        name: name.to_string(),
        min_kn,
        max_kn,
    };
    vec![
        row(1, "sea full speed", 16.6, 17.6),
        row(2, "full ahead", 13.2, 14.5),
        row(3, "half ahead", 10.9, 12.2),
        row(4, "slow ahead", 8.9, 10.0),
        row(5, "dead slow ahead", 5.7, 6.4),
    ]
}

/// The built-in encounter-stage distance bands.
pub fn default_stages() -> Vec<EncounterStage> {
    let row = |id, name: &str, dist_min, dist_max| EncounterStage {
        id,
        name: name.to_string(),
        dist_min,
        dist_max,
    };
    vec![
        row(1, "collision risk", 8.0, 14.0),
        row(2, "close quarters", 2.0, 3.0),
        row(3, "immediate danger", 1.0, 2.0),
        row(4, "no danger", 1.0, 14.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_valid() {
        for (i, m) in default_meeting_situations().iter().enumerate() {
            assert!(m.validate().is_ok(), "situation {i} invalid");
        }
        for (i, s) in default_speed_classes().iter().enumerate() {
            assert!(s.validate().is_ok(), "speed class {i} invalid");
        }
        for (i, s) in default_stages().iter().enumerate() {
            assert!(s.validate().is_ok(), "stage {i} invalid");
        }
        assert!(SafetyThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_load_keeps_valid_rejects_invalid() {
        let text = r#"{
            "meeting_situations": [
                {"id": 1, "name": "head-on", "rel_brg_min": 356.0,
                 "rel_brg_max": 6.0, "dist_min": 8.0, "dist_max": 14.0},
                {"id": 2, "name": "bad", "rel_brg_min": 0.0,
                 "rel_brg_max": 10.0, "dist_min": 9.0, "dist_max": 3.0},
                {"id": 3, "name": 42, "rel_brg_min": 0.0,
                 "rel_brg_max": 10.0, "dist_min": 1.0, "dist_max": 2.0}
            ]
        }"#;
        let (config, diagnostics) = GeneratorConfig::from_json_str(text).unwrap();
        assert_eq!(config.situations.len(), 1);
        assert_eq!(config.situations[0].id, 1);
        assert_eq!(diagnostics.len(), 2, "one invalid + one malformed record");
        // Absent tables fall back to defaults.
        assert_eq!(config.speed_classes.len(), 5);
        assert_eq!(config.stages.len(), 4);
    }

    #[test]
    fn test_load_falls_back_when_nothing_valid() {
        let text = r#"{"speed_classes": [{"id": 1, "name": "x", "min_kn": 9.0, "max_kn": 3.0}]}"#;
        let (config, diagnostics) = GeneratorConfig::from_json_str(text).unwrap();
        assert_eq!(config.speed_classes.len(), 5, "defaults restored");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_bad_thresholds_fall_back() {
        let text = r#"{"thresholds": {"safe_tcpa_min": -5.0}}"#;
        let (config, diagnostics) = GeneratorConfig::from_json_str(text).unwrap();
        assert_eq!(config.thresholds, SafetyThresholds::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_not_json_is_fatal() {
        assert!(GeneratorConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_lookup_by_id() {
        let config = GeneratorConfig::default();
        assert_eq!(config.situation(1).unwrap().name, "head-on");
        assert_eq!(config.speed_class(5).unwrap().name, "dead slow ahead");
        assert_eq!(config.stage(4).unwrap().name, "no danger");
        assert!(config.situation(99).is_none());
    }
}
