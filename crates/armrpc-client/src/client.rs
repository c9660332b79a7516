//! The [`RpcClient`] facade: id allocation, call/await contract, and the
//! typed method catalogue of the robot server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::{json, Map, Value};

use armrpc_wire::{encode_request, Request};

use crate::config::ClientConfig;
use crate::conn::ConnectionManager;
use crate::error::{ClientError, Result};
use crate::types::{
    from_result, AiModel, AprilTag, Joints, Mode, Pose, Status, TaskTraining, TrainingEpisode,
};

/// JSON-RPC client for the robot-arm server.
///
/// Cheap to clone; all clones share one connection, one pending-call
/// registry, and one id counter. Any number of tasks may call
/// [`invoke`](RpcClient::invoke) (or the typed methods) concurrently:
/// requests multiplex over the single socket and responses are correlated
/// back strictly by id.
#[derive(Clone)]
pub struct RpcClient {
    conn: ConnectionManager,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            conn: ConnectionManager::new(config),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Establish the connection without issuing a call.
    /// Calls connect lazily, so this is optional.
    pub async fn connect(&self) -> Result<()> {
        self.conn.open().await
    }

    /// Close the connection, failing any in-flight calls.
    pub async fn disconnect(&self) {
        self.conn.close().await;
    }

    /// Whether the connection is currently open.
    pub async fn is_connected(&self) -> bool {
        self.conn.is_open().await
    }

    /// Number of calls currently awaiting a response.
    pub fn pending_calls(&self) -> usize {
        self.conn.pending().len()
    }

    /// Call a raw method and await its correlated response.
    ///
    /// Opens the connection if closed (one bounded attempt, never a retry
    /// loop). The pending slot is registered before the request is queued,
    /// so a response can never arrive unclaimed. With a configured
    /// `call_timeout`, an overdue call is cancelled and fails with
    /// [`ClientError::Timeout`]; a late answer is dropped.
    pub async fn invoke(&self, method: &str, params: Map<String, Value>) -> Result<Value> {
        self.conn.open().await?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let frame = encode_request(&Request::new(method, params, id))?;
        let rx = self.conn.pending().register(id, method);

        if let Err(err) = self.conn.send(frame).await {
            self.conn.pending().cancel(id);
            return Err(err);
        }
        tracing::debug!(id, method, "request sent");

        match self.conn.config().call_timeout {
            None => rx.await.unwrap_or(Err(ClientError::Disconnected)),
            Some(deadline) => match tokio::time::timeout(deadline, rx).await {
                Ok(outcome) => outcome.unwrap_or(Err(ClientError::Disconnected)),
                Err(_elapsed) => {
                    self.conn.pending().cancel(id);
                    tracing::warn!(id, method, ?deadline, "call timed out");
                    Err(ClientError::Timeout(deadline))
                }
            },
        }
    }

    // Robot mode configuration

    /// Set the operating mode of the arm.
    pub async fn set_mode(&self, mode: Mode) -> Result<()> {
        self.invoke("set_mode", obj(json!({ "mode": mode }))).await?;
        Ok(())
    }

    /// Set the movement speed as a percentage (0-100).
    pub async fn set_speed(&self, percent: u8) -> Result<()> {
        self.invoke("set_speed", obj(json!({ "percent": percent })))
            .await?;
        Ok(())
    }

    /// Set the collision sensitivity as a percentage (0-100).
    pub async fn set_collision_sensitivity(&self, percent: u8) -> Result<()> {
        self.invoke(
            "set_collision_sensitivity",
            obj(json!({ "percent": percent })),
        )
        .await?;
        Ok(())
    }

    // Robot state

    /// Current status of the arm.
    pub async fn get_status(&self) -> Result<Status> {
        from_result(self.invoke("get_status", Map::new()).await?)
    }

    /// Current joint angles.
    pub async fn get_joint_angles(&self) -> Result<Joints> {
        from_result(self.invoke("get_joint_angles", Map::new()).await?)
    }

    /// Current tool pose.
    pub async fn get_tool_pose(&self) -> Result<Pose> {
        from_result(self.invoke("get_tool_pose", Map::new()).await?)
    }

    // Motion

    /// Move the joints to absolute angles, or by an offset from the current
    /// angles when `is_offset` is set.
    pub async fn set_joint_angles(&self, angles: &Joints, is_offset: bool) -> Result<()> {
        self.invoke(
            "set_joint_angles",
            obj(json!({ "angles": angles.to_array(), "is_offset": is_offset })),
        )
        .await?;
        Ok(())
    }

    /// Move the tool to an absolute pose, or by an offset from the current
    /// pose when `is_offset` is set.
    pub async fn set_tool_pose(&self, pose: &Pose, is_offset: bool) -> Result<()> {
        self.invoke(
            "set_tool_pose",
            obj(json!({ "pose": pose.to_array(), "is_offset": is_offset })),
        )
        .await?;
        Ok(())
    }

    /// Move the tool along an arc of the given radius (mm) to the target pose.
    pub async fn move_arc(&self, radius: f64, pose: &Pose, is_offset: bool) -> Result<()> {
        self.invoke(
            "move_arc",
            obj(json!({ "radius": radius, "pose": pose.to_array(), "is_offset": is_offset })),
        )
        .await?;
        Ok(())
    }

    /// Stream joint angles at the given frequency (Hz), optionally with
    /// gripper stroke/force targets.
    pub async fn stream_joint_angles(
        &self,
        frequency: u32,
        joint_angles: &Joints,
        tool_stroke: Option<u8>,
        tool_force: Option<u8>,
    ) -> Result<()> {
        self.invoke(
            "stream_joint_angles",
            obj(json!({
                "frequency": frequency,
                "joint_angles": joint_angles.to_array(),
                "tool_stroke": tool_stroke,
                "tool_force": tool_force,
            })),
        )
        .await?;
        Ok(())
    }

    // Gripper

    /// Open the gripper fully.
    pub async fn open_tool(&self) -> Result<()> {
        self.invoke("open_tool", Map::new()).await?;
        Ok(())
    }

    /// Close the gripper fully.
    pub async fn close_tool(&self) -> Result<()> {
        self.invoke("close_tool", Map::new()).await?;
        Ok(())
    }

    /// Set gripper stroke and force as percentages (0-100).
    pub async fn set_tool_stroke(&self, stroke: u8, force: u8) -> Result<()> {
        self.invoke(
            "set_tool_stroke",
            obj(json!({ "stroke": stroke, "force": force })),
        )
        .await?;
        Ok(())
    }

    // Vision

    /// Detect AprilTags in the arm's field of view.
    pub async fn detect_april_tags(&self) -> Result<Vec<AprilTag>> {
        from_result(self.invoke("detect_april_tags", Map::new()).await?)
    }

    /// Align the tool with an AprilTag. Without an offset the arm centers
    /// on the tag.
    pub async fn align_with_apriltag(&self, id: i64, pose_offset: Option<&Pose>) -> Result<()> {
        self.invoke(
            "align_with_apriltag",
            obj(json!({ "id": id, "pose_offset": pose_offset.map(Pose::to_array) })),
        )
        .await?;
        Ok(())
    }

    /// Detect poses of a named object in the arm's field of view.
    pub async fn detect_poses(&self, object_name: &str) -> Result<Vec<Pose>> {
        from_result(
            self.invoke("detect_poses", obj(json!({ "object_name": object_name })))
                .await?,
        )
    }

    /// Ask the server a yes/no question about the current scene.
    pub async fn verify_scene(&self, question: &str) -> Result<bool> {
        from_result(
            self.invoke("verify_scene", obj(json!({ "question": question })))
                .await?,
        )
    }

    // Episodes, training and inference

    /// Record an episode of the named task for training.
    pub async fn record_episode(
        &self,
        task_name: &str,
        duration_seconds: f64,
    ) -> Result<TrainingEpisode> {
        from_result(
            self.invoke(
                "record_episode",
                obj(json!({ "task_name": task_name, "duration_seconds": duration_seconds })),
            )
            .await?,
        )
    }

    /// Replay a recorded episode.
    pub async fn replay_episode(&self, task_name: &str, id: &str) -> Result<()> {
        self.invoke(
            "replay_episode",
            obj(json!({ "task_name": task_name, "id": id })),
        )
        .await?;
        Ok(())
    }

    /// Delete a recorded episode.
    pub async fn delete_episode(&self, task_name: &str, id: &str) -> Result<()> {
        self.invoke(
            "delete_episode",
            obj(json!({ "task_name": task_name, "id": id })),
        )
        .await?;
        Ok(())
    }

    /// Metadata for the recorded episodes of a task, as the server reports it.
    pub async fn list_episodes(&self, task_name: &str) -> Result<Vec<Value>> {
        from_result(
            self.invoke("list_episodes", obj(json!({ "task_name": task_name })))
                .await?,
        )
    }

    /// Train a model on the recorded episodes of a task.
    pub async fn train_task(
        &self,
        task_name: &str,
        training_name: &str,
        model: AiModel,
    ) -> Result<()> {
        self.invoke(
            "train",
            obj(json!({
                "task_name": task_name,
                "training_name": training_name,
                "model": model,
            })),
        )
        .await?;
        Ok(())
    }

    /// Trainings available on the server, optionally filtered by task.
    pub async fn list_trainings(&self, task_name: Option<&str>) -> Result<Vec<TaskTraining>> {
        from_result(
            self.invoke("list_trainings", obj(json!({ "task_name": task_name })))
                .await?,
        )
    }

    /// Run a trained task. Without a training name the server picks the
    /// latest training.
    pub async fn run_task(&self, task_name: &str, training_name: Option<&str>) -> Result<()> {
        self.invoke(
            "run_task",
            obj(json!({
                "task_name": task_name,
                "training_name": training_name.unwrap_or(""),
            })),
        )
        .await?;
        Ok(())
    }
}

/// Unwrap a `json!` object literal into the params map.
fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        // All callers pass object literals.
        _ => Map::new(),
    }
}
