//! Hooks run around every handler invocation: a tracing span carrying the
//! request context, a closing log line with the response, and CloudWatch
//! Embedded Metric Format (EMF) documents written to stdout.
//!
//! Nothing in here can change the response a handler returns. Metric
//! rendering failures are logged and dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use lambda_http::{Body, Request, RequestExt, Response};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{info, info_span, warn, Span};

static COLD_START: AtomicBool = AtomicBool::new(true);

/// True exactly once per process: on the first invocation that asks.
pub fn take_cold_start() -> bool {
    COLD_START.swap(false, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    pub namespace: String,
    pub service: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricUnit {
    Count,
}

#[derive(Debug, Clone, PartialEq)]
struct MetricValue {
    name: String,
    unit: MetricUnit,
    value: f64,
}

/// Metrics collected during one invocation, flushed as one EMF document.
#[derive(Debug, Clone)]
pub struct Metrics {
    config: MetricsConfig,
    values: Vec<MetricValue>,
}

impl Metrics {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            config: config.clone(),
            values: Vec::new(),
        }
    }

    pub fn add_metric(&mut self, name: impl Into<String>, unit: MetricUnit, value: f64) {
        self.values.push(MetricValue {
            name: name.into(),
            unit,
            value,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Renders the pending metrics, or `None` when nothing was recorded.
    pub fn render(&self, timestamp_ms: u64) -> Option<Value> {
        if self.values.is_empty() {
            return None;
        }

        let definitions: Vec<Value> = self
            .values
            .iter()
            .map(|metric| json!({"Name": metric.name, "Unit": metric.unit}))
            .collect();

        let mut document = Map::new();
        document.insert(
            "_aws".to_string(),
            json!({
                "Timestamp": timestamp_ms,
                "CloudWatchMetrics": [{
                    "Namespace": self.config.namespace,
                    "Dimensions": [["service"]],
                    "Metrics": definitions,
                }],
            }),
        );
        document.insert("service".to_string(), json!(self.config.service));
        for metric in &self.values {
            document.insert(metric.name.clone(), json!(metric.value));
        }

        Some(Value::Object(document))
    }

    /// Writes the pending metrics to stdout and clears them.
    pub fn flush(&mut self) {
        if let Some(document) = self.render(now_millis()) {
            emit(&document);
        }
        self.values.clear();
    }
}

fn cold_start_document(config: &MetricsConfig, function: &str, timestamp_ms: u64) -> Value {
    json!({
        "_aws": {
            "Timestamp": timestamp_ms,
            "CloudWatchMetrics": [{
                "Namespace": config.namespace,
                "Dimensions": [["service", "function_name"]],
                "Metrics": [{"Name": "ColdStart", "Unit": MetricUnit::Count}],
            }],
        },
        "service": config.service,
        "function_name": function,
        "ColdStart": 1.0,
    })
}

fn emit(document: &Value) {
    match serde_json::to_string(document) {
        Ok(line) => println!("{line}"),
        Err(err) => warn!(error = %err, "failed to render metrics document"),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Per-invocation observability state: opened before the store call,
/// closed with [`Invocation::finish`] once the response is built.
pub struct Invocation {
    path: String,
    metrics: Metrics,
    span: Span,
}

impl Invocation {
    pub fn start(function: &'static str, event: &Request, config: &MetricsConfig) -> Self {
        let request_id = event
            .lambda_context_ref()
            .map(|context| context.request_id.clone())
            .unwrap_or_default();
        let path = event.uri().path().to_string();
        let cold_start = take_cold_start();

        let span = info_span!(
            "handler",
            function,
            aws_request_id = %request_id,
            cold_start,
            service = %config.service,
            resource_path = %path,
        );

        span.in_scope(|| {
            info!(method = %event.method(), path = %path, "Received event");
        });

        if cold_start {
            emit(&cold_start_document(config, function, now_millis()));
        }

        Self {
            path,
            metrics: Metrics::new(config),
            span,
        }
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn metrics(&mut self) -> &mut Metrics {
        &mut self.metrics
    }

    pub fn finish(mut self, response: &Response<Body>) {
        let _entered = self.span.enter();
        info!(
            "response from: {} statusCode: {} body: {}",
            self.path,
            response.status().as_u16(),
            String::from_utf8_lossy(response.body()),
        );
        self.metrics.flush();
    }
}
