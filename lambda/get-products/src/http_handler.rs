use lambda_http::{Body, Error, Request, Response};
use serde::Serialize;
use shared::observability::{Invocation, MetricUnit, Metrics, MetricsConfig};
use shared::response::{serialized_response, store_error_response};
use shared::{Product, ProductStore};
use tracing::{error, info, Instrument};

#[derive(Serialize)]
struct ProductList<'a> {
    products: &'a [Product],
}

pub(crate) async fn function_handler<S>(
    store: &S,
    metrics: &MetricsConfig,
    event: Request,
) -> Result<Response<Body>, Error>
where
    S: ProductStore + ?Sized,
{
    let mut invocation = Invocation::start("get-products", &event, metrics);
    let span = invocation.span();

    let response = list_products(store, invocation.metrics())
        .instrument(span)
        .await?;

    invocation.finish(&response);
    Ok(response)
}

async fn list_products<S>(store: &S, metrics: &mut Metrics) -> Result<Response<Body>, Error>
where
    S: ProductStore + ?Sized,
{
    match store.get_products().await {
        Ok(products) => {
            info!(details = ?products, "Products retrieved");
            metrics.add_metric("productsRetrieved", MetricUnit::Count, 1.0);

            serialized_response(
                200,
                &ProductList {
                    products: &products,
                },
            )
        }
        Err(err) => {
            error!(error = %err, "Unexpected error occurred while trying to retrieve products");
            store_error_response(&err)
        }
    }
}
