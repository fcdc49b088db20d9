//! AWS Lambda handler for running household projections
//!
//! Accepts simulation parameters via JSON and returns the headline summary,
//! optionally with the full year table and a rate-scenario comparison.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use aws_lambda_events::event::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use household_projector::access::{AccessGate, GateSession};
use household_projector::projection::{ProjectionConfig, ProjectionSummary, YearRecord};
use household_projector::{ScenarioRunner, SimulationParameters};

/// Input for one projection
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectionRequest {
    /// Household parameters; missing fields take their defaults
    pub parameters: SimulationParameters,

    /// Seed for the rate path (random when omitted)
    pub seed: Option<u64>,

    /// Checked against PROJECTOR_SECRET when that is set
    pub password: Option<String>,

    /// Return every year's record, not just the summary
    pub include_records: bool,

    /// Also run every rate scenario with the same seed
    pub compare_rates: bool,
}

#[derive(Debug, Serialize)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub summary: ProjectionSummary,
}

/// Output from the projection
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub summary: ProjectionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<YearRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_scenarios: Option<Vec<ScenarioSummary>>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn error_response(status: i64, message: &str) -> Result<LambdaFunctionUrlResponse, Error> {
    Ok(LambdaFunctionUrlResponse {
        status_code: status,
        body: Some(serde_json::to_string(&ErrorBody { error: message })?),
        headers: Default::default(),
        is_base64_encoded: false,
        cookies: Vec::new(),
    })
}

fn json_response(body: &ProjectionResponse) -> Result<LambdaFunctionUrlResponse, Error> {
    Ok(LambdaFunctionUrlResponse {
        status_code: 200,
        body: Some(serde_json::to_string(body)?),
        headers: Default::default(),
        is_base64_encoded: false,
        cookies: Vec::new(),
    })
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<LambdaFunctionUrlResponse, Error> {
    let start = std::time::Instant::now();
    let payload = event.payload;

    // CORS preflight
    if payload.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(LambdaFunctionUrlResponse {
            status_code: 200,
            body: None,
            headers: Default::default(),
            is_base64_encoded: false,
            cookies: Vec::new(),
        });
    }

    if payload.is_base64_encoded {
        return error_response(400, "request body must be plain JSON");
    }
    let body = payload.body.unwrap_or_default();
    let request: ProjectionRequest = if body.trim().is_empty() {
        ProjectionRequest::default()
    } else {
        match serde_json::from_str(&body) {
            Ok(request) => request,
            Err(e) => return error_response(400, &format!("invalid JSON: {}", e)),
        }
    };

    let gate = AccessGate::from_env();
    let mut session = GateSession::new();
    if gate.is_configured() && !gate.attempt(&mut session, request.password.as_deref().unwrap_or("")) {
        return error_response(401, "access denied");
    }

    let config = ProjectionConfig {
        seed: request.seed,
        ..Default::default()
    };
    if let Err(e) = request.parameters.validate_for(config.start_year) {
        warn!("Rejected parameters: {}", e);
        return error_response(400, &e.to_string());
    }

    let runner = ScenarioRunner::new();

    let rate_scenarios = request.compare_rates.then(|| {
        runner
            .run_rate_scenarios(&request.parameters, config.clone())
            .into_iter()
            .map(|(scenario, result)| ScenarioSummary {
                scenario: scenario.label().to_string(),
                summary: result.summary(),
            })
            .collect()
    });

    let result = runner.run(&request.parameters, config);
    let summary = result.summary();
    let execution_time_ms = start.elapsed().as_millis() as u64;
    info!("Projected {} years in {} ms", summary.years, execution_time_ms);

    let response = ProjectionResponse {
        summary,
        records: request.include_records.then_some(result.records),
        rate_scenarios,
        execution_time_ms,
    };

    json_response(&response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
