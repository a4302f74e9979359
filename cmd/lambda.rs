use chrono::Utc;
use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use log::{error, info};
use serde::Serialize;
use serde_json::Value;

use r53dump::backup::{Backup, BackupReport};
use r53dump::error::Result;
use r53dump::provider::ZoneProvider;
use r53dump::store::ObjectStore;

const BODY_SUCCESS: &str = "Successful execution";
const BODY_FAILURE: &str = "Execution exception";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub fn from_outcome(outcome: &Result<BackupReport>) -> Self {
        match outcome {
            Ok(report) if report.is_success() => Self {
                status_code: 200,
                body: BODY_SUCCESS.to_string(),
            },
            _ => Self {
                status_code: 500,
                body: BODY_FAILURE.to_string(),
            },
        }
    }
}

/// Serves invocations until the runtime API goes away. Every invocation,
/// whatever its payload, takes one snapshot.
pub async fn serve<P, S>(backup: Backup<P, S>) -> std::result::Result<(), LambdaError>
where
    P: ZoneProvider,
    S: ObjectStore,
{
    let backup = &backup;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<Response, LambdaError>(handle(backup, event).await)
    }))
    .await
}

async fn handle<P, S>(backup: &Backup<P, S>, event: LambdaEvent<Value>) -> Response
where
    P: ZoneProvider,
    S: ObjectStore,
{
    let (payload, ctx) = event.into_parts();
    info!("invocation {} triggered by {}", ctx.request_id, trigger(&payload));

    let outcome = backup.run(Utc::now()).await;
    if let Err(e) = &outcome {
        error!("invocation {} failed: {}", ctx.request_id, e);
    }

    Response::from_outcome(&outcome)
}

/// Scheduled rules and CloudTrail-driven rules both carry `detail-type`;
/// anything else is a direct invocation.
fn trigger(payload: &Value) -> String {
    let detail_type = payload.get("detail-type").and_then(Value::as_str);
    let event_name = payload.pointer("/detail/eventName").and_then(Value::as_str);

    match (detail_type, event_name) {
        (Some(detail_type), Some(event_name)) => format!("{} ({})", detail_type, event_name),
        (Some(detail_type), None) => detail_type.to_string(),
        _ => "direct invocation".to_string(),
    }
}
