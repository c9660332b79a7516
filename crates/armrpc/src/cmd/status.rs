use armrpc_client::RpcClient;

use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat};

pub async fn run(client: &RpcClient, format: OutputFormat) -> CliResult<i32> {
    let status = client
        .get_status()
        .await
        .map_err(|err| client_error("get_status failed", err))?;
    print_record(format, &status);
    Ok(SUCCESS)
}
