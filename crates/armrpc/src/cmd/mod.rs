use clap::{Args, Subcommand, ValueEnum};

use armrpc_client::{AiModel, ClientConfig, Joints, Mode, Pose, RpcClient};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod ai;
pub mod configure;
pub mod motion;
pub mod status;
pub mod tool;
pub mod version;
pub mod vision;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the robot's current status.
    Status,
    /// Set the operating mode.
    SetMode(SetModeArgs),
    /// Set the movement speed.
    SetSpeed(PercentArgs),
    /// Set the collision sensitivity.
    SetCollisionSensitivity(PercentArgs),
    /// Print the current joint angles.
    Joints,
    /// Print the current tool pose.
    Pose,
    /// Move the joints to the given angles.
    MoveJoints(MoveJointsArgs),
    /// Move the tool to the given pose.
    MovePose(MovePoseArgs),
    /// Move the tool along an arc to the given pose.
    MoveArc(MoveArcArgs),
    /// Open the gripper.
    OpenTool,
    /// Close the gripper.
    CloseTool,
    /// Set gripper stroke and force.
    SetToolStroke(ToolStrokeArgs),
    /// Detect AprilTags in the field of view.
    DetectTags,
    /// Align the tool with an AprilTag.
    Align(AlignArgs),
    /// Detect poses of a named object.
    DetectPoses(DetectPosesArgs),
    /// Ask a yes/no question about the scene.
    VerifyScene(VerifySceneArgs),
    /// Record a training episode.
    RecordEpisode(RecordEpisodeArgs),
    /// Replay a recorded episode.
    ReplayEpisode(EpisodeRefArgs),
    /// Delete a recorded episode.
    DeleteEpisode(EpisodeRefArgs),
    /// List recorded episodes for a task.
    ListEpisodes(TaskArgs),
    /// Train a model on recorded episodes.
    Train(TrainArgs),
    /// List trainings, optionally filtered by task.
    ListTrainings(ListTrainingsArgs),
    /// Run a trained task.
    RunTask(RunTaskArgs),
    /// Show version information.
    Version,
}

pub async fn run(command: Command, config: ClientConfig, format: OutputFormat) -> CliResult<i32> {
    let client = RpcClient::new(config);
    let result = dispatch(command, &client, format).await;
    client.disconnect().await;
    result
}

async fn dispatch(command: Command, client: &RpcClient, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Status => status::run(client, format).await,
        Command::SetMode(args) => configure::set_mode(client, args).await,
        Command::SetSpeed(args) => configure::set_speed(client, args).await,
        Command::SetCollisionSensitivity(args) => {
            configure::set_collision_sensitivity(client, args).await
        }
        Command::Joints => motion::joints(client, format).await,
        Command::Pose => motion::pose(client, format).await,
        Command::MoveJoints(args) => motion::move_joints(client, args).await,
        Command::MovePose(args) => motion::move_pose(client, args).await,
        Command::MoveArc(args) => motion::move_arc(client, args).await,
        Command::OpenTool => tool::open(client).await,
        Command::CloseTool => tool::close(client).await,
        Command::SetToolStroke(args) => tool::set_stroke(client, args).await,
        Command::DetectTags => vision::detect_tags(client, format).await,
        Command::Align(args) => vision::align(client, args).await,
        Command::DetectPoses(args) => vision::detect_poses(client, args, format).await,
        Command::VerifyScene(args) => vision::verify_scene(client, args, format).await,
        Command::RecordEpisode(args) => ai::record_episode(client, args, format).await,
        Command::ReplayEpisode(args) => ai::replay_episode(client, args).await,
        Command::DeleteEpisode(args) => ai::delete_episode(client, args).await,
        Command::ListEpisodes(args) => ai::list_episodes(client, args, format).await,
        Command::Train(args) => ai::train(client, args).await,
        Command::ListTrainings(args) => ai::list_trainings(client, args, format).await,
        Command::RunTask(args) => ai::run_task(client, args).await,
        Command::Version => version::run(format),
    }
}

/// CLI spelling of [`Mode`].
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Drag,
    Teleoperation,
    Autonomous,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Drag => Mode::Drag,
            ModeArg::Teleoperation => Mode::Teleoperation,
            ModeArg::Autonomous => Mode::Autonomous,
        }
    }
}

/// CLI spelling of [`AiModel`].
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModelArg {
    Pi0,
    Pi0Fast,
    Act,
    Diffusion,
    Tdmpc,
    Vqbet,
}

impl From<ModelArg> for AiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Pi0 => AiModel::Pi0,
            ModelArg::Pi0Fast => AiModel::Pi0Fast,
            ModelArg::Act => AiModel::Act,
            ModelArg::Diffusion => AiModel::Diffusion,
            ModelArg::Tdmpc => AiModel::Tdmpc,
            ModelArg::Vqbet => AiModel::Vqbet,
        }
    }
}

#[derive(Args, Debug)]
pub struct SetModeArgs {
    /// Mode to switch to.
    pub mode: ModeArg,
}

#[derive(Args, Debug)]
pub struct PercentArgs {
    /// Percentage value (0-100).
    pub percent: u8,
}

#[derive(Args, Debug)]
pub struct MoveJointsArgs {
    /// Six joint angles in degrees.
    #[arg(num_args = 6, allow_negative_numbers = true, value_names = ["J1", "J2", "J3", "J4", "J5", "J6"])]
    pub angles: Vec<f64>,
    /// Treat the angles as offsets from the current angles.
    #[arg(long)]
    pub offset: bool,
}

#[derive(Args, Debug)]
pub struct MovePoseArgs {
    /// Target pose.
    #[arg(num_args = 6, allow_negative_numbers = true, value_names = ["X", "Y", "Z", "ROLL", "PITCH", "YAW"])]
    pub pose: Vec<f64>,
    /// Treat the pose as an offset from the current pose.
    #[arg(long)]
    pub offset: bool,
}

#[derive(Args, Debug)]
pub struct MoveArcArgs {
    /// Arc radius in mm.
    #[arg(long)]
    pub radius: f64,
    /// Target pose.
    #[arg(num_args = 6, allow_negative_numbers = true, value_names = ["X", "Y", "Z", "ROLL", "PITCH", "YAW"])]
    pub pose: Vec<f64>,
    /// Treat the pose as an offset from the current pose.
    #[arg(long)]
    pub offset: bool,
}

#[derive(Args, Debug)]
pub struct ToolStrokeArgs {
    /// Stroke percentage (0-100).
    pub stroke: u8,
    /// Force percentage (0-100).
    #[arg(long, default_value_t = 0)]
    pub force: u8,
}

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// AprilTag id to align with.
    pub id: i64,
    /// Pose offset from the tag; omit to center on it.
    #[arg(long, num_args = 6, allow_negative_numbers = true, value_names = ["X", "Y", "Z", "ROLL", "PITCH", "YAW"])]
    pub offset_pose: Option<Vec<f64>>,
}

#[derive(Args, Debug)]
pub struct DetectPosesArgs {
    /// Object to look for.
    pub object_name: String,
}

#[derive(Args, Debug)]
pub struct VerifySceneArgs {
    /// Question to ask about the scene.
    pub question: String,
}

#[derive(Args, Debug)]
pub struct RecordEpisodeArgs {
    /// Task the episode belongs to.
    pub task_name: String,
    /// Recording duration in seconds.
    #[arg(long)]
    pub duration: f64,
}

#[derive(Args, Debug)]
pub struct EpisodeRefArgs {
    /// Task the episode belongs to.
    pub task_name: String,
    /// Episode id.
    pub id: String,
}

#[derive(Args, Debug)]
pub struct TaskArgs {
    /// Task name.
    pub task_name: String,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Task to train on.
    pub task_name: String,
    /// Name to give the training.
    pub training_name: String,
    /// Model architecture to train.
    #[arg(long, value_enum, default_value_t = ModelArg::Pi0)]
    pub model: ModelArg,
}

#[derive(Args, Debug)]
pub struct ListTrainingsArgs {
    /// Only list trainings of this task.
    #[arg(long)]
    pub task_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct RunTaskArgs {
    /// Task to run.
    pub task_name: String,
    /// Training to use; omit for the latest.
    #[arg(long)]
    pub training_name: Option<String>,
}

/// Build a [`Joints`] from six positional angle values.
pub fn joints_from_slice(angles: &[f64]) -> CliResult<Joints> {
    match angles {
        [j1, j2, j3, j4, j5, j6] => Ok(Joints::new(*j1, *j2, *j3, *j4, *j5, *j6)),
        _ => Err(CliError::new(USAGE, "expected exactly six joint angles")),
    }
}

/// Build a [`Pose`] from six positional values.
pub fn pose_from_slice(values: &[f64]) -> CliResult<Pose> {
    match values {
        [x, y, z, roll, pitch, yaw] => Ok(Pose::new(*x, *y, *z, *roll, *pitch, *yaw)),
        _ => Err(CliError::new(USAGE, "expected exactly six pose values")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_from_slice_requires_six_values() {
        assert!(pose_from_slice(&[1.0, 2.0, 3.0]).is_err());
        let pose = pose_from_slice(&[1.0, 2.0, 3.0, 0.0, 0.0, 90.0]).unwrap();
        assert_eq!(pose.yaw, 90.0);
    }

    #[test]
    fn joints_from_slice_requires_six_values() {
        assert!(joints_from_slice(&[]).is_err());
        let joints = joints_from_slice(&[0.0, -45.0, 90.0, 0.0, 45.0, 0.0]).unwrap();
        assert_eq!(joints.j3, 90.0);
    }
}
