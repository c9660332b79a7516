use armrpc_client::RpcClient;

use crate::cmd::{joints_from_slice, pose_from_slice, MoveArcArgs, MoveJointsArgs, MovePoseArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat};

pub async fn joints(client: &RpcClient, format: OutputFormat) -> CliResult<i32> {
    let joints = client
        .get_joint_angles()
        .await
        .map_err(|err| client_error("get_joint_angles failed", err))?;
    print_record(format, &joints);
    Ok(SUCCESS)
}

pub async fn pose(client: &RpcClient, format: OutputFormat) -> CliResult<i32> {
    let pose = client
        .get_tool_pose()
        .await
        .map_err(|err| client_error("get_tool_pose failed", err))?;
    print_record(format, &pose);
    Ok(SUCCESS)
}

pub async fn move_joints(client: &RpcClient, args: MoveJointsArgs) -> CliResult<i32> {
    let angles = joints_from_slice(&args.angles)?;
    client
        .set_joint_angles(&angles, args.offset)
        .await
        .map_err(|err| client_error("set_joint_angles failed", err))?;
    Ok(SUCCESS)
}

pub async fn move_pose(client: &RpcClient, args: MovePoseArgs) -> CliResult<i32> {
    let pose = pose_from_slice(&args.pose)?;
    client
        .set_tool_pose(&pose, args.offset)
        .await
        .map_err(|err| client_error("set_tool_pose failed", err))?;
    Ok(SUCCESS)
}

pub async fn move_arc(client: &RpcClient, args: MoveArcArgs) -> CliResult<i32> {
    let pose = pose_from_slice(&args.pose)?;
    client
        .move_arc(args.radius, &pose, args.offset)
        .await
        .map_err(|err| client_error("move_arc failed", err))?;
    Ok(SUCCESS)
}
