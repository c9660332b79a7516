use armrpc_client::RpcClient;

use crate::cmd::{PercentArgs, SetModeArgs};
use crate::exit::{client_error, CliError, CliResult, SUCCESS, USAGE};

fn check_percent(percent: u8) -> CliResult<u8> {
    if percent > 100 {
        return Err(CliError::new(USAGE, "percent must be between 0 and 100"));
    }
    Ok(percent)
}

pub async fn set_mode(client: &RpcClient, args: SetModeArgs) -> CliResult<i32> {
    client
        .set_mode(args.mode.into())
        .await
        .map_err(|err| client_error("set_mode failed", err))?;
    Ok(SUCCESS)
}

pub async fn set_speed(client: &RpcClient, args: PercentArgs) -> CliResult<i32> {
    client
        .set_speed(check_percent(args.percent)?)
        .await
        .map_err(|err| client_error("set_speed failed", err))?;
    Ok(SUCCESS)
}

pub async fn set_collision_sensitivity(client: &RpcClient, args: PercentArgs) -> CliResult<i32> {
    client
        .set_collision_sensitivity(check_percent(args.percent)?)
        .await
        .map_err(|err| client_error("set_collision_sensitivity failed", err))?;
    Ok(SUCCESS)
}
