use lambda_http::{Body, Error, Request, Response};
use shared::observability::{Invocation, MetricUnit, Metrics, MetricsConfig};
use shared::response::{message_response, path_id, serialized_response, store_error_response};
use shared::ProductStore;
use tracing::{error, info, Instrument};

pub(crate) async fn function_handler<S>(
    store: &S,
    metrics: &MetricsConfig,
    event: Request,
) -> Result<Response<Body>, Error>
where
    S: ProductStore + ?Sized,
{
    let mut invocation = Invocation::start("get-product", &event, metrics);
    let span = invocation.span();

    let response = get_product(store, invocation.metrics(), &event)
        .instrument(span)
        .await?;

    invocation.finish(&response);
    Ok(response)
}

async fn get_product<S>(
    store: &S,
    metrics: &mut Metrics,
    event: &Request,
) -> Result<Response<Body>, Error>
where
    S: ProductStore + ?Sized,
{
    let Some(id) = path_id(event) else {
        return message_response(400, "Missing 'id' parameter in path");
    };

    match store.get_product(&id).await {
        Ok(Some(product)) => {
            info!(details = ?product, "Product retrieved");
            metrics.add_metric("productRetrieved", MetricUnit::Count, 1.0);
            serialized_response(200, &product)
        }
        Ok(None) => {
            info!(id = %id, "Product not found");
            message_response(404, "Product not found")
        }
        Err(err) => {
            error!(error = %err, id = %id, "Unexpected error occurred while trying to retrieve product");
            store_error_response(&err)
        }
    }
}
