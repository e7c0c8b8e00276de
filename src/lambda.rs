use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use myth_relay::utils::{logger, validation::Validate};
use myth_relay::{route, GeminiClient, HttpEvent, HttpResponse, QueryRelay, RelayConfig};

async fn function_handler(
    relay: &QueryRelay<GeminiClient>,
    event: LambdaEvent<HttpEvent>,
) -> Result<HttpResponse, Error> {
    tracing::info!(request_id = %event.context.request_id, "Function invoked");

    let response = route(relay, &event.payload).await;

    tracing::info!(status = response.status_code, "Function completed");
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // Read once per cold start; the relay itself keeps no per-request state.
    let config = RelayConfig::from_env();
    config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    tracing::info!("Loaded configuration: {:?}", config);

    let client = GeminiClient::new(&config);
    let relay = QueryRelay::new(config, client);
    let relay = &relay;

    run(service_fn(move |event: LambdaEvent<HttpEvent>| async move {
        function_handler(relay, event).await
    }))
    .await
}
