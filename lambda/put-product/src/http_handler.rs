use lambda_http::{Body, Error, Request, Response};
use shared::observability::{Invocation, MetricUnit, Metrics, MetricsConfig};
use shared::response::{message_response, path_id, store_error_response};
use shared::{Product, ProductStore};
use tracing::{error, info, warn, Instrument};

pub(crate) async fn function_handler<S>(
    store: &S,
    metrics: &MetricsConfig,
    event: Request,
) -> Result<Response<Body>, Error>
where
    S: ProductStore + ?Sized,
{
    let mut invocation = Invocation::start("put-product", &event, metrics);
    let span = invocation.span();

    let response = put_product(store, invocation.metrics(), &event)
        .instrument(span)
        .await?;

    invocation.finish(&response);
    Ok(response)
}

async fn put_product<S>(
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

    let body = event.body();
    if body.is_empty() {
        return message_response(400, "Empty request body");
    }

    let product: Product = match serde_json::from_slice(body.as_ref()) {
        Ok(product) => product,
        Err(e) => {
            warn!(error = %e, "Rejected product body");
            return message_response(
                400,
                &format!("Failed to parse product from request body: {}", e),
            );
        }
    };

    if product.id != id {
        return message_response(400, "Product ID in the body does not match path parameter");
    }

    match store.put_product(&product).await {
        Ok(()) => {
            info!(details = ?product, "Created product");
            metrics.add_metric("productCreated", MetricUnit::Count, 1.0);
            message_response(201, "Product created")
        }
        Err(err) => {
            error!(error = %err, id = %id, "Unexpected error occurred while trying to create product");
            store_error_response(&err)
        }
    }
}
