//! Domain value types and their wire marshalling.
//!
//! Plain immutable records mirroring the server's JSON shapes. Poses and
//! joint vectors go out as 6-element arrays in request params but come back
//! as keyed objects in results; both forms are covered here.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Decode a call result into a typed domain value.
pub fn from_result<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| ClientError::MalformedResponse(err.to_string()))
}

/// Operating mode of the arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Drag,
    Teleoperation,
    Autonomous,
}

/// Tool pose: position in mm, orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            x,
            y,
            z,
            roll,
            pitch,
            yaw,
        }
    }

    /// Wire parameter form: `[x, y, z, roll, pitch, yaw]`.
    pub fn to_array(&self) -> [f64; 6] {
        [self.x, self.y, self.z, self.roll, self.pitch, self.yaw]
    }
}

/// Joint angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joints {
    pub j1: f64,
    pub j2: f64,
    pub j3: f64,
    pub j4: f64,
    pub j5: f64,
    pub j6: f64,
}

impl Joints {
    pub fn new(j1: f64, j2: f64, j3: f64, j4: f64, j5: f64, j6: f64) -> Self {
        Self {
            j1,
            j2,
            j3,
            j4,
            j5,
            j6,
        }
    }

    /// Wire parameter form: `[j1, j2, j3, j4, j5, j6]`.
    pub fn to_array(&self) -> [f64; 6] {
        [self.j1, self.j2, self.j3, self.j4, self.j5, self.j6]
    }
}

/// Arm status report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub mode: Mode,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A 2D image point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A detected AprilTag: image-space geometry plus the tool-frame offset to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AprilTag {
    pub id: i64,
    pub center: Point,
    pub corners: Vec<Point>,
    pub offset: Pose,
}

/// A recorded training episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingEpisode {
    pub id: String,
    pub task_name: String,
    pub duration_seconds: f64,
    pub created_at: String,
}

/// Model architectures the server can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiModel {
    Pi0,
    Pi0Fast,
    Act,
    Diffusion,
    Tdmpc,
    Vqbet,
}

/// A completed or in-progress training of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTraining {
    pub id: String,
    pub task_name: String,
    pub training_name: String,
    pub model: AiModel,
    pub training_episode_count: u64,
    pub status: String,
    pub created_at: String,
}
