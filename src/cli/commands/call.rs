//! Call command - run one tool call and print `{source, data}` as JSON

use super::probe_if_needed;
use crate::audit::CallLog;
use crate::cli::CallArgs;
use crate::config::Config;
use crate::error::{BridgeError, BridgeResult};
use crate::resolver::{Freshness, HybridResolver};
use crate::tools::ToolCall;
use serde_json::{json, Value};
use std::time::Instant;

pub async fn execute(args: CallArgs, config: &Config) -> BridgeResult<()> {
    let params = parse_params(args.params.as_deref())?;
    let freshness = if args.live {
        Freshness::Live
    } else {
        Freshness::Cached
    };
    let call = ToolCall::parse(&args.tool, &params)?.with_freshness(freshness);

    let resolver = HybridResolver::from_config(config).await?;
    probe_if_needed(&resolver, freshness).await;

    let started = Instant::now();
    let outcome = call.execute(&resolver).await;
    CallLog::new(config)
        .record(call.tool, &outcome, started.elapsed())
        .await;

    let result = outcome?;
    let body = json!({"source": result.source, "data": result.data});
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn parse_params(raw: Option<&str>) -> BridgeResult<Value> {
    match raw {
        None => Ok(Value::Null),
        Some(s) if s.trim().is_empty() => Ok(Value::Null),
        Some(s) => serde_json::from_str(s)
            .map_err(|e| BridgeError::InvalidRequest(format!("--params is not valid JSON: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_to_null() {
        assert_eq!(parse_params(None).unwrap(), Value::Null);
        assert_eq!(parse_params(Some("  ")).unwrap(), Value::Null);
    }

    #[test]
    fn params_must_be_json() {
        assert_eq!(
            parse_params(Some(r#"{"school_id": 1000}"#)).unwrap(),
            json!({"school_id": 1000})
        );
        let err = parse_params(Some("school_id=1000")).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidRequest(_)));
    }
}
