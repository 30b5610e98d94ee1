use lambda_http::{run, service_fn, tracing, Error};
use shared::{Config, DynamoDbStore};
mod http_handler;
use http_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;
    let sdk_config = config.load_sdk_config().await;
    let store = DynamoDbStore::new(
        aws_sdk_dynamodb::Client::new(&sdk_config),
        &config.table_name,
    );
    let metrics = config.metrics_config();

    run(service_fn(|event| function_handler(&store, &metrics, event))).await
}
