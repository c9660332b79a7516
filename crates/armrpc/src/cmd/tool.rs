use armrpc_client::RpcClient;

use crate::cmd::ToolStrokeArgs;
use crate::exit::{client_error, CliResult, SUCCESS};

pub async fn open(client: &RpcClient) -> CliResult<i32> {
    client
        .open_tool()
        .await
        .map_err(|err| client_error("open_tool failed", err))?;
    Ok(SUCCESS)
}

pub async fn close(client: &RpcClient) -> CliResult<i32> {
    client
        .close_tool()
        .await
        .map_err(|err| client_error("close_tool failed", err))?;
    Ok(SUCCESS)
}

pub async fn set_stroke(client: &RpcClient, args: ToolStrokeArgs) -> CliResult<i32> {
    client
        .set_tool_stroke(args.stroke, args.force)
        .await
        .map_err(|err| client_error("set_tool_stroke failed", err))?;
    Ok(SUCCESS)
}
