// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation tracks: one ordered keyframe curve per layer property.

use crate::error::{Result, TimelineError};
use crate::evaluator;
use crate::keyframe::{InterpolationMode, Keyframe, KeyframeId};
use crate::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};

/// Two keyframe times closer than this are the same time
const SAME_TIME_EPSILON: f64 = 1e-9;

/// Animation curve for a single layer property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TrackRecord")]
pub struct Track {
    /// Display label
    pub label: String,
    /// Kind of value stored in this track
    pub kind: ValueKind,
    /// Keyframes, sorted by time with unique times
    keyframes: Vec<Keyframe>,
    /// Value used while the track has no keyframes
    pub default_value: Value,
    /// Lower clamp bound for numeric values
    pub min: Option<f64>,
    /// Upper clamp bound for numeric values
    pub max: Option<f64>,
    /// Paired-axis lock (scale X/Y edited together)
    pub linked: Option<bool>,
}

/// Stored form of a track; loading restores the keyframe invariants
#[derive(Deserialize)]
struct TrackRecord {
    label: String,
    kind: ValueKind,
    keyframes: Vec<Keyframe>,
    default_value: Value,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    linked: Option<bool>,
}

impl From<TrackRecord> for Track {
    fn from(record: TrackRecord) -> Self {
        let kind = record.default_value.kind();
        if kind != record.kind {
            tracing::warn!(
                "Track {} stores {} values but defaults to {}; using {}",
                record.label,
                record.kind,
                kind,
                kind
            );
        }

        let mut track = Track {
            label: record.label,
            kind,
            keyframes: Vec::new(),
            default_value: record.default_value,
            min: record.min,
            max: record.max,
            linked: record.linked,
        };
        track.default_value = track.clamp(track.default_value.clone());

        let stored = record.keyframes.len();
        let mut keyframes: Vec<Keyframe> = record
            .keyframes
            .into_iter()
            .filter(|k| k.value.kind() == kind)
            .map(|mut k| {
                k.value = track.clamp(k.value);
                k
            })
            .collect();
        sort_by_time(&mut keyframes);
        // the last stored key wins a shared time
        keyframes.reverse();
        keyframes.dedup_by(|later, kept| (later.time - kept.time).abs() < SAME_TIME_EPSILON);
        keyframes.reverse();

        if keyframes.len() != stored {
            tracing::warn!(
                "Track {}: dropped {} keyframes with a foreign kind or a duplicate time",
                track.label,
                stored - keyframes.len()
            );
        }
        track.keyframes = keyframes;
        track
    }
}

impl Track {
    /// Create a new track whose kind follows the default value
    pub fn new(label: impl Into<String>, default_value: impl Into<Value>) -> Self {
        let default_value = default_value.into();
        Self {
            label: label.into(),
            kind: default_value.kind(),
            keyframes: Vec::new(),
            default_value,
            min: None,
            max: None,
            linked: None,
        }
    }

    /// Set clamp bounds
    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self.default_value = self.clamp(self.default_value.clone());
        self
    }

    /// Set the paired-axis lock
    pub fn with_linked(mut self, linked: bool) -> Self {
        self.linked = Some(linked);
        self
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Get keyframe by ID
    pub fn keyframe(&self, keyframe_id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == keyframe_id)
    }

    /// Get keyframe within `tolerance` of `time`
    pub fn keyframe_near(&self, time: f64, tolerance: f64) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| (k.time - time).abs() < tolerance)
    }

    /// Evaluate the track at a given time
    pub fn sample(&self, time: f64) -> Value {
        evaluator::sample(self, time)
    }

    /// Reject values of another kind
    pub fn check_kind(&self, value: &Value) -> Result<()> {
        if value.kind() == self.kind {
            Ok(())
        } else {
            Err(TimelineError::KindMismatch {
                expected: self.kind,
                found: value.kind(),
            })
        }
    }

    /// Clamp a value into this track's bounds
    pub fn clamp(&self, value: Value) -> Value {
        value.clamped(self.min, self.max)
    }

    /// Add a keyframe, replacing any keyframe at exactly the same time
    pub fn add_keyframe(&mut self, mut keyframe: Keyframe) -> Result<KeyframeId> {
        self.check_kind(&keyframe.value)?;
        keyframe.value = self.clamp(keyframe.value);
        let id = keyframe.id;
        self.keyframes
            .retain(|k| (k.time - keyframe.time).abs() >= SAME_TIME_EPSILON);
        self.keyframes.push(keyframe);
        self.sort_keyframes();
        Ok(id)
    }

    /// Insert or update the keyframe at `time`.
    ///
    /// A keyframe within `tolerance` keeps its ID and flags and takes the new value.
    pub fn set_keyframe_at(&mut self, time: f64, value: Value, tolerance: f64) -> Result<KeyframeId> {
        self.check_kind(&value)?;
        let value = self.clamp(value);

        if let Some(existing) = self
            .keyframes
            .iter_mut()
            .find(|k| (k.time - time).abs() < tolerance)
        {
            existing.value = value;
            return Ok(existing.id);
        }

        let keyframe = Keyframe::new(time, value);
        let id = keyframe.id;
        let index = self.keyframes.partition_point(|k| k.time < time);
        self.keyframes.insert(index, keyframe);
        Ok(id)
    }

    /// Remove a keyframe
    pub fn remove_keyframe(&mut self, keyframe_id: KeyframeId) -> Option<Keyframe> {
        let index = self.keyframes.iter().position(|k| k.id == keyframe_id)?;
        Some(self.keyframes.remove(index))
    }

    /// Move keyframe to a new time (clamped to zero).
    ///
    /// Another keyframe within `tolerance` of the destination is replaced.
    pub fn move_keyframe(&mut self, keyframe_id: KeyframeId, new_time: f64, tolerance: f64) -> Result<()> {
        if self.keyframe(keyframe_id).is_none() {
            return Err(TimelineError::KeyframeNotFound(keyframe_id));
        }
        let new_time = new_time.max(0.0);
        self.keyframes
            .retain(|k| k.id == keyframe_id || (k.time - new_time).abs() >= tolerance);
        if let Some(kf) = self.keyframes.iter_mut().find(|k| k.id == keyframe_id) {
            kf.time = new_time;
        }
        self.sort_keyframes();
        Ok(())
    }

    /// Set interpolation mode of a keyframe
    pub fn set_interpolation(&mut self, keyframe_id: KeyframeId, mode: InterpolationMode) -> Result<()> {
        let kf = self.keyframe_mut(keyframe_id)?;
        kf.interpolation = mode;
        Ok(())
    }

    /// Set easing flags of a keyframe
    pub fn set_easing(&mut self, keyframe_id: KeyframeId, ease_in: bool, ease_out: bool) -> Result<()> {
        let kf = self.keyframe_mut(keyframe_id)?;
        kf.ease_in = ease_in;
        kf.ease_out = ease_out;
        Ok(())
    }

    /// Offset all keyframes by a time delta
    pub fn offset_time(&mut self, delta: f64) {
        for kf in &mut self.keyframes {
            kf.time += delta;
        }
    }

    /// Rewrite every keyframe value and the default value, clamping the results
    pub fn map_values(&mut self, f: impl Fn(&Value) -> Value) {
        let (min, max) = (self.min, self.max);
        for kf in &mut self.keyframes {
            kf.value = f(&kf.value).clamped(min, max);
        }
        self.default_value = self.clamp(f(&self.default_value));
    }

    /// Explicit structural copy used for history snapshots
    pub fn snapshot(&self) -> Track {
        Track {
            label: self.label.clone(),
            kind: self.kind,
            keyframes: self.keyframes.iter().map(Keyframe::snapshot).collect(),
            default_value: self.default_value.clone(),
            min: self.min,
            max: self.max,
            linked: self.linked,
        }
    }

    fn keyframe_mut(&mut self, keyframe_id: KeyframeId) -> Result<&mut Keyframe> {
        self.keyframes
            .iter_mut()
            .find(|k| k.id == keyframe_id)
            .ok_or(TimelineError::KeyframeNotFound(keyframe_id))
    }

    /// Sort keyframes by time
    fn sort_keyframes(&mut self) {
        sort_by_time(&mut self.keyframes);
    }
}

fn sort_by_time(keyframes: &mut [Keyframe]) {
    keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Vec2;

    const TOL: f64 = 0.5 / 30.0;

    #[test]
    fn test_set_keyframe_keeps_order() {
        let mut track = Track::new("Opacity", 100.0);
        track.set_keyframe_at(2.0, Value::Scalar(1.0), TOL).unwrap();
        track.set_keyframe_at(0.5, Value::Scalar(2.0), TOL).unwrap();
        track.set_keyframe_at(1.0, Value::Scalar(3.0), TOL).unwrap();

        let times: Vec<f64> = track.keyframes().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.5, 1.0, 2.0]);
    }

    #[test]
    fn test_set_keyframe_overwrites_and_keeps_flags() {
        let mut track = Track::new("Rotation", 0.0);
        let id = track
            .add_keyframe(Keyframe::new(1.0, 10.0).with_easing(true, true))
            .unwrap();

        let again = track.set_keyframe_at(1.0, Value::Scalar(20.0), TOL).unwrap();
        assert_eq!(id, again);
        assert_eq!(track.keyframe_count(), 1);
        let kf = track.keyframe(id).unwrap();
        assert_eq!(kf.value, Value::Scalar(20.0));
        assert!(kf.ease_in && kf.ease_out);
    }

    #[test]
    fn test_write_clamps() {
        let mut track = Track::new("Opacity", 100.0).with_bounds(Some(0.0), Some(100.0));
        let id = track.set_keyframe_at(0.0, Value::Scalar(140.0), TOL).unwrap();
        assert_eq!(track.keyframe(id).unwrap().value, Value::Scalar(100.0));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut track = Track::new("Position", Vec2::ZERO);
        let err = track.set_keyframe_at(0.0, Value::Scalar(1.0), TOL).unwrap_err();
        assert!(matches!(
            err,
            TimelineError::KindMismatch { expected: ValueKind::Vector2, found: ValueKind::Scalar }
        ));
        assert_eq!(track.keyframe_count(), 0);
    }

    #[test]
    fn test_move_keyframe_resorts_and_clamps() {
        let mut track = Track::new("Rotation", 0.0);
        let a = track.add_keyframe(Keyframe::new(0.0, 0.0)).unwrap();
        let b = track.add_keyframe(Keyframe::new(1.0, 1.0)).unwrap();

        track.move_keyframe(a, 2.0, TOL).unwrap();
        assert_eq!(track.keyframes()[0].id, b);
        assert_eq!(track.keyframes()[1].id, a);

        track.move_keyframe(b, -3.0, TOL).unwrap();
        assert_eq!(track.keyframe(b).unwrap().time, 0.0);
    }

    #[test]
    fn test_move_onto_occupied_time_replaces() {
        let mut track = Track::new("Rotation", 0.0);
        let a = track.add_keyframe(Keyframe::new(0.0, 0.0)).unwrap();
        track.add_keyframe(Keyframe::new(1.0, 1.0)).unwrap();

        track.move_keyframe(a, 1.0, TOL).unwrap();
        assert_eq!(track.keyframe_count(), 1);
        assert_eq!(track.keyframes()[0].id, a);
    }

    #[test]
    fn test_deserialize_sorts() {
        let mut track = Track::new("Rotation", 0.0);
        track.add_keyframe(Keyframe::new(0.0, 0.0)).unwrap();
        track.add_keyframe(Keyframe::new(1.0, 1.0)).unwrap();
        let mut json = serde_json::to_value(&track).unwrap();
        json["keyframes"].as_array_mut().unwrap().reverse();

        let loaded: Track = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, track);
    }

    #[test]
    fn test_deserialize_restores_invariants() {
        let mut track = Track::new("Opacity", 100.0).with_bounds(Some(0.0), Some(100.0));
        track.add_keyframe(Keyframe::new(0.0, 10.0)).unwrap();
        track.add_keyframe(Keyframe::new(1.0, 20.0)).unwrap();
        let mut json = serde_json::to_value(&track).unwrap();
        let keys = json["keyframes"].as_array_mut().unwrap();
        let mut duplicate = keys[1].clone();
        duplicate["id"] = serde_json::to_value(KeyframeId::new()).unwrap();
        duplicate["value"] = serde_json::to_value(Value::Scalar(250.0)).unwrap();
        keys.push(duplicate);
        let mut foreign = keys[0].clone();
        foreign["time"] = serde_json::json!(0.5);
        foreign["value"] = serde_json::to_value(Value::from("oops")).unwrap();
        keys.push(foreign);

        let loaded: Track = serde_json::from_value(json).unwrap();
        let values: Vec<(f64, Value)> = loaded.keyframes().iter().map(|k| (k.time, k.value.clone())).collect();
        assert_eq!(
            values,
            vec![(0.0, Value::Scalar(10.0)), (1.0, Value::Scalar(100.0))]
        );
    }

    #[test]
    fn test_keyframe_near() {
        let mut track = Track::new("Rotation", 0.0);
        let id = track.add_keyframe(Keyframe::new(1.0, 5.0)).unwrap();
        assert_eq!(track.keyframe_near(1.01, TOL).map(|k| k.id), Some(id));
        assert!(track.keyframe_near(1.1, TOL).is_none());
    }
}
