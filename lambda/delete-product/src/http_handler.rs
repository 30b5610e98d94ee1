use lambda_http::{Body, Error, Request, Response};
use shared::observability::{Invocation, MetricUnit, Metrics, MetricsConfig};
use shared::response::{message_response, path_id, store_error_response};
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
    let mut invocation = Invocation::start("delete-product", &event, metrics);
    let span = invocation.span();

    let response = delete_product(store, invocation.metrics(), &event)
        .instrument(span)
        .await?;

    invocation.finish(&response);
    Ok(response)
}

async fn delete_product<S>(
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

    match store.delete_product(&id).await {
        Ok(()) => {
            info!(id = %id, "Product deleted");
            metrics.add_metric("productDeleted", MetricUnit::Count, 1.0);
            message_response(200, "Product deleted")
        }
        Err(err) => {
            error!(error = %err, id = %id, "Unexpected error occurred while trying to delete product");
            store_error_response(&err)
        }
    }
}
