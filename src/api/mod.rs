use axum::{
    Router,
    extract::{Json, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

use crate::config::EngineConfig;
use crate::core::{
    AccessDecision, DebtInput, DebtPayoff, GoalProjection, GoalState, ProjectionInput,
    ProjectionResult, SavingsYear, SolverConfig, Subscription, Tier, check_access, estimate_with,
    payoff_schedule, required_monthly_contribution, required_payment, simulate_savings,
    solve_with,
};
use crate::error::ProjectionError;

type SharedConfig = Arc<EngineConfig>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FirePayload {
    monthly_expenses: Option<f64>,
    current_savings: Option<f64>,
    monthly_savings: Option<f64>,
    #[serde(alias = "nominalReturn")]
    nominal_return_pct: Option<f64>,
    #[serde(alias = "inflation")]
    inflation_pct: Option<f64>,
    #[serde(alias = "withdrawalRate")]
    withdrawal_rate_pct: Option<f64>,
    max_years: Option<u32>,
    target_years: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
struct FireRequest {
    input: ProjectionInput,
    solver: SolverConfig,
    target_years: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FireResponse {
    max_years: u32,
    projection: ProjectionResult,
    target_years: Option<u32>,
    required_monthly_contribution: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequiredContributionResponse {
    target_years: u32,
    required_monthly_contribution: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebtPayload {
    balance: f64,
    annual_rate_pct: f64,
    #[serde(default)]
    monthly_payment: f64,
    target_months: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebtResponse {
    payoff: DebtPayoff,
    target_months: Option<u32>,
    required_payment: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavingsPayload {
    #[serde(default)]
    initial: f64,
    #[serde(default)]
    monthly_contribution: f64,
    annual_rate_pct: f64,
    years: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavingsResponse {
    final_balance: f64,
    years: Vec<SavingsYear>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessPayload {
    #[serde(default)]
    subscriptions: Vec<Subscription>,
    required: Tier,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn build_router(config: EngineConfig) -> Router {
    let state: SharedConfig = Arc::new(config);
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/fire", get(fire_get_handler).post(fire_post_handler))
        .route(
            "/api/fire/required-contribution",
            post(required_contribution_handler),
        )
        .route("/api/goal", post(goal_handler))
        .route("/api/debt", post(debt_handler))
        .route("/api/savings", post(savings_handler))
        .route("/api/access", post(access_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(port: u16, config: EngineConfig) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = build_router(config);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "projection API listening");
    tracing::info!("Local access: http://127.0.0.1:{port}/health");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn fire_get_handler(
    State(config): State<SharedConfig>,
    Query(payload): Query<FirePayload>,
) -> Response {
    fire_handler_impl(&config, payload)
}

async fn fire_post_handler(
    State(config): State<SharedConfig>,
    Json(payload): Json<FirePayload>,
) -> Response {
    fire_handler_impl(&config, payload)
}

fn fire_handler_impl(config: &EngineConfig, payload: FirePayload) -> Response {
    let request = match fire_request_from_payload(payload, config) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };
    match build_fire_response(request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(e) => bad_request(&e.to_string()),
    }
}

async fn required_contribution_handler(
    State(config): State<SharedConfig>,
    Json(payload): Json<FirePayload>,
) -> Response {
    let request = match fire_request_from_payload(payload, &config) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };
    let Some(target_years) = request.target_years else {
        return bad_request("targetYears is required");
    };
    match required_monthly_contribution(&request.input, target_years) {
        Ok(required) => json_response(
            StatusCode::OK,
            RequiredContributionResponse {
                target_years,
                required_monthly_contribution: required,
            },
        ),
        Err(e) => bad_request(&e.to_string()),
    }
}

async fn goal_handler(
    State(config): State<SharedConfig>,
    Json(goal): Json<GoalState>,
) -> Response {
    match estimate_with(&goal, &config.goals) {
        Ok(projection) => json_response::<GoalProjection>(StatusCode::OK, projection),
        Err(e) => bad_request(&e.to_string()),
    }
}

async fn debt_handler(
    State(config): State<SharedConfig>,
    Json(payload): Json<DebtPayload>,
) -> Response {
    match build_debt_response(payload, &config) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(e) => bad_request(&e.to_string()),
    }
}

async fn savings_handler(
    State(config): State<SharedConfig>,
    Json(payload): Json<SavingsPayload>,
) -> Response {
    match build_savings_response(payload, &config) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(e) => bad_request(&e.to_string()),
    }
}

async fn access_handler(Json(payload): Json<AccessPayload>) -> Response {
    let now = payload.now.unwrap_or_else(Utc::now);
    let decision: AccessDecision = check_access(&payload.subscriptions, payload.required, now);
    json_response(StatusCode::OK, decision)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn bad_request(msg: &str) -> Response {
    tracing::warn!(error = msg, "rejected request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

#[cfg(test)]
fn fire_request_from_json(json: &str, config: &EngineConfig) -> Result<FireRequest, String> {
    let payload = serde_json::from_str::<FirePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    fire_request_from_payload(payload, config)
}

fn fire_request_from_payload(
    payload: FirePayload,
    config: &EngineConfig,
) -> Result<FireRequest, String> {
    let mut input = default_projection_input();
    let mut solver = config.solver;

    if let Some(v) = payload.monthly_expenses {
        input.monthly_expenses = v;
    }
    if let Some(v) = payload.current_savings {
        input.current_savings = v;
    }
    if let Some(v) = payload.monthly_savings {
        input.monthly_savings = v;
    }
    if let Some(v) = payload.nominal_return_pct {
        input.nominal_return_pct = v;
    }
    if let Some(v) = payload.inflation_pct {
        input.inflation_pct = v;
    }
    if let Some(v) = payload.withdrawal_rate_pct {
        input.withdrawal_rate_pct = v;
    }
    if let Some(v) = payload.max_years {
        if v == 0 || v > config.solver.max_years {
            return Err(format!(
                "maxYears must be between 1 and {}",
                config.solver.max_years
            ));
        }
        solver.max_years = v;
    }
    if payload.target_years == Some(0) {
        return Err("targetYears must be > 0".to_string());
    }

    Ok(FireRequest {
        input,
        solver,
        target_years: payload.target_years,
    })
}

fn default_projection_input() -> ProjectionInput {
    ProjectionInput {
        monthly_expenses: 500_000.0,
        current_savings: 0.0,
        monthly_savings: 100_000.0,
        nominal_return_pct: 15.0,
        inflation_pct: 12.0,
        withdrawal_rate_pct: 4.0,
    }
}

fn build_fire_response(request: FireRequest) -> Result<FireResponse, ProjectionError> {
    let projection = solve_with(&request.input, request.solver)?;
    let required_monthly_contribution = request
        .target_years
        .map(|years| required_monthly_contribution(&request.input, years))
        .transpose()?;

    Ok(FireResponse {
        max_years: request.solver.max_years,
        projection,
        target_years: request.target_years,
        required_monthly_contribution,
    })
}

fn build_debt_response(
    payload: DebtPayload,
    config: &EngineConfig,
) -> Result<DebtResponse, ProjectionError> {
    let input = DebtInput {
        balance: payload.balance,
        annual_rate_pct: payload.annual_rate_pct,
        monthly_payment: payload.monthly_payment,
    };
    let payoff = payoff_schedule(&input, config.debt_horizon_months())?;
    let required_payment = payload
        .target_months
        .map(|months| required_payment(payload.balance, payload.annual_rate_pct, months))
        .transpose()?;

    Ok(DebtResponse {
        payoff,
        target_months: payload.target_months,
        required_payment,
    })
}

fn build_savings_response(
    payload: SavingsPayload,
    config: &EngineConfig,
) -> Result<SavingsResponse, ProjectionError> {
    if payload.years > config.solver.max_years {
        return Err(ProjectionError::invalid_input(format!(
            "years must be <= {}",
            config.solver.max_years
        )));
    }

    let years = simulate_savings(
        payload.initial,
        payload.monthly_contribution,
        payload.annual_rate_pct,
        payload.years,
    )?;
    let final_balance = years.last().map_or(payload.initial, |row| row.balance);
    Ok(SavingsResponse {
        final_balance,
        years,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::YearsToFire;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn fire_request_from_json_parses_web_keys() {
        let json = r#"{
          "monthlyExpenses": 300000,
          "currentSavings": 2000000,
          "monthlySavings": 150000,
          "nominalReturnPct": 10,
          "inflationPct": 8,
          "withdrawalRatePct": 3.5,
          "maxYears": 60,
          "targetYears": 25
        }"#;
        let request =
            fire_request_from_json(json, &EngineConfig::default()).expect("json should parse");

        assert_approx(request.input.monthly_expenses, 300_000.0);
        assert_approx(request.input.current_savings, 2_000_000.0);
        assert_approx(request.input.monthly_savings, 150_000.0);
        assert_approx(request.input.nominal_return_pct, 10.0);
        assert_approx(request.input.inflation_pct, 8.0);
        assert_approx(request.input.withdrawal_rate_pct, 3.5);
        assert_eq!(request.solver.max_years, 60);
        assert_eq!(request.target_years, Some(25));
    }

    #[test]
    fn fire_request_accepts_short_aliases() {
        let json = r#"{ "nominalReturn": 9, "inflation": 3, "withdrawalRate": 5 }"#;
        let request =
            fire_request_from_json(json, &EngineConfig::default()).expect("json should parse");
        assert_approx(request.input.nominal_return_pct, 9.0);
        assert_approx(request.input.inflation_pct, 3.0);
        assert_approx(request.input.withdrawal_rate_pct, 5.0);
    }

    #[test]
    fn empty_payload_uses_defaults_and_configured_horizon() {
        let mut config = EngineConfig::default();
        config.solver.max_years = 60;
        let request = fire_request_from_json("{}", &config).expect("json should parse");
        assert_eq!(request.input, default_projection_input());
        assert_eq!(request.solver.max_years, 60);
        assert_eq!(request.target_years, None);
    }

    #[test]
    fn max_years_above_configured_horizon_is_rejected() {
        let err = fire_request_from_json(r#"{ "maxYears": 500 }"#, &EngineConfig::default())
            .expect_err("must reject");
        assert!(err.contains("maxYears"));
    }

    #[test]
    fn zero_target_years_is_rejected() {
        let err = fire_request_from_json(r#"{ "targetYears": 0 }"#, &EngineConfig::default())
            .expect_err("must reject");
        assert!(err.contains("targetYears"));
    }

    #[test]
    fn fire_response_includes_projection_and_required_contribution() {
        let json = r#"{ "targetYears": 30 }"#;
        let request = fire_request_from_json(json, &EngineConfig::default()).expect("valid");
        let response = build_fire_response(request).expect("valid");

        assert_approx(response.projection.fire_number, 150_000_000.0);
        assert!(response.required_monthly_contribution.is_some());

        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"projection\""));
        assert!(json.contains("\"fireNumber\""));
        assert!(json.contains("\"realReturnPct\""));
        assert!(json.contains("\"yearsToFire\""));
        assert!(json.contains("\"requiredMonthlyContribution\""));
        assert!(json.contains("\"maxYears\":100"));
    }

    #[test]
    fn zero_withdrawal_rate_surfaces_validation_message() {
        let json = r#"{ "withdrawalRatePct": 0 }"#;
        let request =
            fire_request_from_json(json, &EngineConfig::default()).expect("payload parses");
        let err = build_fire_response(request).expect_err("must reject");
        assert!(err.to_string().contains("withdrawal rate"));
    }

    #[test]
    fn unreachable_projection_reports_infinite_years() {
        let json = r#"{ "monthlySavings": 0, "nominalReturnPct": 5, "inflationPct": 5 }"#;
        let request = fire_request_from_json(json, &EngineConfig::default()).expect("valid");
        let response = build_fire_response(request).expect("valid");
        assert_eq!(response.projection.years_to_fire, YearsToFire::Infinite);
        assert!(!response.projection.is_achievable);
    }

    #[test]
    fn debt_response_uses_configured_horizon() {
        let payload: DebtPayload = serde_json::from_str(
            r#"{ "balance": 1000, "annualRatePct": 0, "monthlyPayment": 1, "targetMonths": 10 }"#,
        )
        .expect("payload parses");
        let config = EngineConfig {
            debt_max_months: Some(24),
            ..EngineConfig::default()
        };
        let response = build_debt_response(payload, &config).expect("valid");
        assert!(!response.payoff.paid_off);
        assert_approx(response.payoff.total_paid, 24.0);
        assert_approx(response.required_payment.expect("requested"), 100.0);
    }

    #[test]
    fn savings_response_reports_final_balance() {
        let payload: SavingsPayload = serde_json::from_str(
            r#"{ "initial": 100, "monthlyContribution": 10, "annualRatePct": 0, "years": 3 }"#,
        )
        .expect("payload parses");
        let response = build_savings_response(payload, &EngineConfig::default()).expect("valid");
        assert_eq!(response.years.len(), 3);
        assert_approx(response.final_balance, 460.0);
    }

    #[test]
    fn savings_beyond_horizon_is_rejected() {
        let json = r#"{ "annualRatePct": 5, "years": 101 }"#;
        let payload: SavingsPayload = serde_json::from_str(json).expect("payload parses");
        assert!(build_savings_response(payload, &EngineConfig::default()).is_err());
    }

    #[test]
    fn negative_savings_amounts_are_rejected() {
        let json = r#"{ "initial": -5, "annualRatePct": 5, "years": 2 }"#;
        let payload: SavingsPayload = serde_json::from_str(json).expect("payload parses");
        let err = build_savings_response(payload, &EngineConfig::default()).expect_err("reject");
        assert!(matches!(err, ProjectionError::InvalidInput(_)));
    }

    #[test]
    fn access_payload_parses_subscription_records() {
        let payload: AccessPayload = serde_json::from_str(
            r#"{
              "required": "premium",
              "now": "2025-06-01T00:00:00Z",
              "subscriptions": [
                { "tier": "premium", "status": "trialing", "trialEndsAt": "2025-05-30T00:00:00Z" }
              ]
            }"#,
        )
        .expect("payload parses");
        let now = payload.now.expect("now given");
        let decision = check_access(&payload.subscriptions, payload.required, now);
        assert!(!decision.is_granted());
    }
}
