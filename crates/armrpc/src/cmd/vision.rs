use armrpc_client::RpcClient;
use serde_json::json;

use crate::cmd::{pose_from_slice, AlignArgs, DetectPosesArgs, VerifySceneArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_record, print_rows, OutputFormat};

pub async fn detect_tags(client: &RpcClient, format: OutputFormat) -> CliResult<i32> {
    let tags = client
        .detect_april_tags()
        .await
        .map_err(|err| client_error("detect_april_tags failed", err))?;
    let rows = tags
        .iter()
        .map(|tag| {
            vec![
                tag.id.to_string(),
                format!("({:.1}, {:.1})", tag.center.x, tag.center.y),
                format!(
                    "({:.1}, {:.1}, {:.1})",
                    tag.offset.x, tag.offset.y, tag.offset.z
                ),
            ]
        })
        .collect();
    print_rows(format, vec!["ID", "CENTER", "OFFSET"], rows, &tags);
    Ok(SUCCESS)
}

pub async fn align(client: &RpcClient, args: AlignArgs) -> CliResult<i32> {
    let offset = match &args.offset_pose {
        Some(values) => Some(pose_from_slice(values)?),
        None => None,
    };
    client
        .align_with_apriltag(args.id, offset.as_ref())
        .await
        .map_err(|err| client_error("align_with_apriltag failed", err))?;
    Ok(SUCCESS)
}

pub async fn detect_poses(
    client: &RpcClient,
    args: DetectPosesArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    let poses = client
        .detect_poses(&args.object_name)
        .await
        .map_err(|err| client_error("detect_poses failed", err))?;
    let rows = poses
        .iter()
        .map(|pose| {
            vec![
                format!("({:.1}, {:.1}, {:.1})", pose.x, pose.y, pose.z),
                format!("({:.1}, {:.1}, {:.1})", pose.roll, pose.pitch, pose.yaw),
            ]
        })
        .collect();
    print_rows(format, vec!["POSITION", "ORIENTATION"], rows, &poses);
    Ok(SUCCESS)
}

pub async fn verify_scene(
    client: &RpcClient,
    args: VerifySceneArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    let verified = client
        .verify_scene(&args.question)
        .await
        .map_err(|err| client_error("verify_scene failed", err))?;
    print_record(
        format,
        &json!({ "question": args.question, "verified": verified }),
    );
    Ok(SUCCESS)
}
