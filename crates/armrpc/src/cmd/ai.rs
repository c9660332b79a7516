use armrpc_client::RpcClient;

use crate::cmd::{
    EpisodeRefArgs, ListTrainingsArgs, RecordEpisodeArgs, RunTaskArgs, TaskArgs, TrainArgs,
};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_record, print_rows, OutputFormat};

pub async fn record_episode(
    client: &RpcClient,
    args: RecordEpisodeArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    let episode = client
        .record_episode(&args.task_name, args.duration)
        .await
        .map_err(|err| client_error("record_episode failed", err))?;
    print_record(format, &episode);
    Ok(SUCCESS)
}

pub async fn replay_episode(client: &RpcClient, args: EpisodeRefArgs) -> CliResult<i32> {
    client
        .replay_episode(&args.task_name, &args.id)
        .await
        .map_err(|err| client_error("replay_episode failed", err))?;
    Ok(SUCCESS)
}

pub async fn delete_episode(client: &RpcClient, args: EpisodeRefArgs) -> CliResult<i32> {
    client
        .delete_episode(&args.task_name, &args.id)
        .await
        .map_err(|err| client_error("delete_episode failed", err))?;
    Ok(SUCCESS)
}

pub async fn list_episodes(
    client: &RpcClient,
    args: TaskArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    let episodes = client
        .list_episodes(&args.task_name)
        .await
        .map_err(|err| client_error("list_episodes failed", err))?;
    // Episode metadata is server-defined; render ids where present.
    let rows = episodes
        .iter()
        .map(|episode| {
            vec![
                episode["id"].as_str().unwrap_or_default().to_string(),
                episode["duration_seconds"].to_string(),
                episode["created_at"].as_str().unwrap_or_default().to_string(),
            ]
        })
        .collect();
    print_rows(
        format,
        vec!["ID", "DURATION_S", "CREATED_AT"],
        rows,
        &episodes,
    );
    Ok(SUCCESS)
}

pub async fn train(client: &RpcClient, args: TrainArgs) -> CliResult<i32> {
    client
        .train_task(&args.task_name, &args.training_name, args.model.into())
        .await
        .map_err(|err| client_error("train failed", err))?;
    Ok(SUCCESS)
}

pub async fn list_trainings(
    client: &RpcClient,
    args: ListTrainingsArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    let trainings = client
        .list_trainings(args.task_name.as_deref())
        .await
        .map_err(|err| client_error("list_trainings failed", err))?;
    let rows = trainings
        .iter()
        .map(|training| {
            vec![
                training.task_name.clone(),
                training.training_name.clone(),
                format!("{:?}", training.model),
                training.training_episode_count.to_string(),
                training.status.clone(),
            ]
        })
        .collect();
    print_rows(
        format,
        vec!["TASK", "TRAINING", "MODEL", "EPISODES", "STATUS"],
        rows,
        &trainings,
    );
    Ok(SUCCESS)
}

pub async fn run_task(client: &RpcClient, args: RunTaskArgs) -> CliResult<i32> {
    client
        .run_task(&args.task_name, args.training_name.as_deref())
        .await
        .map_err(|err| client_error("run_task failed", err))?;
    Ok(SUCCESS)
}
