mod currency;
mod presenter;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::history::{
    Asset, AssetReturn, AssetSeries, MergedRow, asset_return, default_year_range, filter_years,
    merge_on_date,
};
use crate::core::{
    ContributionMode, Projection, ProjectionRow, ScenarioInput, Verdict, project,
    validate_age_range,
};

pub use currency::{Currency, NumberSystem};
pub use presenter::{column_headers, format_amount, render_table, verdict_message};

const INDEX_HTML: &str = include_str!("../../web/index.html");

const MAX_AGE: u32 = 120;
const MAX_BASE_AMOUNT: f64 = 1_000.0;
const MAX_RATE_PERCENT: f64 = 50.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliInvestmentType {
    Single,
    Regular,
}

impl From<CliInvestmentType> for ContributionMode {
    fn from(value: CliInvestmentType) -> Self {
        match value {
            CliInvestmentType::Single => ContributionMode::SingleInvestment,
            CliInvestmentType::Regular => ContributionMode::RecurringAnnual,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiInvestmentType {
    #[serde(alias = "singleInvestment", alias = "single_investment")]
    Single,
    #[serde(
        alias = "recurring",
        alias = "recurringAnnual",
        alias = "recurring-annual",
        alias = "recurring_annual"
    )]
    Regular,
}

impl From<ApiInvestmentType> for CliInvestmentType {
    fn from(value: ApiInvestmentType) -> Self {
        match value {
            ApiInvestmentType::Single => CliInvestmentType::Single,
            ApiInvestmentType::Regular => CliInvestmentType::Regular,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    currency: Option<Currency>,
    number_system: Option<NumberSystem>,
    base_amount: Option<f64>,
    lump_sum: Option<f64>,
    investment_type: Option<ApiInvestmentType>,
    annual_investment: Option<f64>,
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    rate_of_return: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "retirement_game",
    about = "Retirement corpus planner: required vs projected corpus by age"
)]
struct Cli {
    #[arg(long, value_enum, default_value_t = Currency::Usd)]
    currency: Currency,
    #[arg(
        long,
        value_enum,
        default_value_t = NumberSystem::Thousand,
        help = "Scale applied to --base-amount; INR offers thousand/lakhs/crores, others thousand/millions/billions/trillions"
    )]
    number_system: NumberSystem,
    #[arg(
        long,
        default_value_t = 100.0,
        help = "Base retirement amount (0-1000), multiplied by --number-system"
    )]
    base_amount: f64,
    #[arg(
        long,
        default_value_t = 10_000.0,
        help = "Lump sum available for investment at the current age"
    )]
    lump_sum: f64,
    #[arg(long, value_enum, default_value_t = CliInvestmentType::Single)]
    investment_type: CliInvestmentType,
    #[arg(
        long,
        default_value_t = 5_000.0,
        help = "Annual investment amount; used only with --investment-type=regular"
    )]
    annual_investment: f64,
    #[arg(long, default_value_t = 30)]
    current_age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Estimated rate of return per year in percent (0-50)"
    )]
    rate_of_return: f64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug)]
struct PlanRequest {
    currency: Currency,
    scenario: ScenarioInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    currency: &'static str,
    symbol: &'static str,
    target_corpus: f64,
    current_age: u32,
    retirement_age: u32,
    rows: Vec<ProjectionRow>,
    verdict: Verdict,
    summary: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HistoryPayload {
    series: Vec<AssetSeries>,
    start_year: Option<i32>,
    end_year: Option<i32>,
    assets: Option<Vec<Asset>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetSummary {
    asset: Asset,
    label: &'static str,
    ticker: &'static str,
    performance: Option<AssetReturn>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    start_year: i32,
    end_year: i32,
    rows: Vec<MergedRow>,
    summaries: Vec<AssetSummary>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<PlanRequest, String> {
    if !cli.base_amount.is_finite() || !(0.0..=MAX_BASE_AMOUNT).contains(&cli.base_amount) {
        return Err(format!(
            "--base-amount must be between 0 and {MAX_BASE_AMOUNT}"
        ));
    }

    if !cli.currency.supports(cli.number_system) {
        return Err(format!(
            "--number-system {:?} is not available for {}",
            cli.number_system,
            cli.currency.code()
        ));
    }

    if !cli.lump_sum.is_finite() || cli.lump_sum < 0.0 {
        return Err("--lump-sum must be >= 0".to_string());
    }

    if cli.current_age > MAX_AGE {
        return Err(format!("--current-age must be between 0 and {MAX_AGE}"));
    }

    if cli.retirement_age > MAX_AGE {
        return Err(format!("--retirement-age must be between 0 and {MAX_AGE}"));
    }

    if !cli.rate_of_return.is_finite() || !(0.0..=MAX_RATE_PERCENT).contains(&cli.rate_of_return)
    {
        return Err(format!(
            "--rate-of-return must be between 0 and {MAX_RATE_PERCENT}"
        ));
    }

    let contribution_mode: ContributionMode = cli.investment_type.into();
    let annual_contribution = match contribution_mode {
        ContributionMode::SingleInvestment => 0.0,
        ContributionMode::RecurringAnnual => {
            if !cli.annual_investment.is_finite() || cli.annual_investment < 0.0 {
                return Err("--annual-investment must be >= 0".to_string());
            }
            cli.annual_investment
        }
    };

    let scenario = ScenarioInput {
        target_corpus: cli.base_amount * cli.number_system.multiplier(),
        lump_sum: cli.lump_sum,
        contribution_mode,
        annual_contribution,
        current_age: cli.current_age,
        retirement_age: cli.retirement_age,
        annual_rate: cli.rate_of_return / 100.0,
    };
    validate_age_range(&scenario).map_err(|e| e.to_string())?;

    Ok(PlanRequest {
        currency: cli.currency,
        scenario,
    })
}

fn run_plan(request: &PlanRequest) -> Result<Projection, String> {
    project(&request.scenario).map_err(|e| e.to_string())
}

/// Parses the command line, prints the plan table and the verdict.
pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let request = build_inputs(&cli)?;
    let projection = run_plan(&request)?;

    match cli.format {
        OutputFormat::Table => {
            println!("Retirement Investment Plan by Age");
            print!("{}", render_table(&projection, request.currency));
            println!();
            println!(
                "{}",
                verdict_message(
                    &projection,
                    request.currency,
                    request.scenario.retirement_age
                )
            );
        }
        OutputFormat::Json => {
            let response = build_project_response(&request, projection);
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| format!("Failed to serialize plan: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/history/summary", post(history_summary_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("retirement planner listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(payload: Result<Query<ProjectPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => project_handler_impl(payload),
        Err(rejection) => malformed_request_response(&rejection.body_text()),
    }
}

async fn project_post_handler(payload: Result<Json<ProjectPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => project_handler_impl(payload),
        Err(rejection) => malformed_request_response(&rejection.body_text()),
    }
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let request = match plan_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            warn!("rejected projection request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    debug!(
        "projection request: {} years, {:?}",
        request.scenario.horizon_years(),
        request.scenario.contribution_mode
    );

    match run_plan(&request) {
        Ok(projection) => json_response(
            StatusCode::OK,
            build_project_response(&request, projection),
        ),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn history_summary_handler(payload: Result<Json<HistoryPayload>, JsonRejection>) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return malformed_request_response(&rejection.body_text()),
    };

    match build_history_response(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => {
            warn!("rejected history request: {msg}");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

fn malformed_request_response(detail: &str) -> Response {
    let msg = format!("Invalid request payload: {detail}");
    warn!("rejected malformed request: {msg}");
    error_response(StatusCode::BAD_REQUEST, &msg)
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn plan_request_from_json(json: &str) -> Result<PlanRequest, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    plan_request_from_payload(payload)
}

fn plan_request_from_payload(payload: ProjectPayload) -> Result<PlanRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.currency {
        cli.currency = v;
    }
    if let Some(v) = payload.number_system {
        cli.number_system = v;
    }
    if let Some(v) = payload.base_amount {
        cli.base_amount = v;
    }
    if let Some(v) = payload.lump_sum {
        cli.lump_sum = v;
    }
    if let Some(v) = payload.investment_type {
        cli.investment_type = v.into();
    }
    if let Some(v) = payload.annual_investment {
        cli.annual_investment = v;
    }
    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.rate_of_return {
        cli.rate_of_return = v;
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        currency: Currency::Usd,
        number_system: NumberSystem::Thousand,
        base_amount: 100.0,
        lump_sum: 10_000.0,
        investment_type: CliInvestmentType::Single,
        annual_investment: 5_000.0,
        current_age: 30,
        retirement_age: 65,
        rate_of_return: 7.0,
        format: OutputFormat::Json,
    }
}

fn build_project_response(request: &PlanRequest, projection: Projection) -> ProjectResponse {
    let summary = verdict_message(
        &projection,
        request.currency,
        request.scenario.retirement_age,
    );
    ProjectResponse {
        currency: request.currency.code(),
        symbol: request.currency.symbol(),
        target_corpus: request.scenario.target_corpus,
        current_age: request.scenario.current_age,
        retirement_age: request.scenario.retirement_age,
        rows: projection.rows,
        verdict: projection.verdict,
        summary,
    }
}

fn build_history_response(payload: HistoryPayload) -> Result<HistoryResponse, String> {
    let merged = merge_on_date(&payload.series);
    let Some((default_start, default_end)) = default_year_range(&merged) else {
        return Err("No price data supplied".to_string());
    };

    let start_year = payload.start_year.unwrap_or(default_start);
    let end_year = payload.end_year.unwrap_or(default_end);
    let rows = filter_years(&merged, start_year, end_year).map_err(|e| e.to_string())?;

    let selected = payload
        .assets
        .unwrap_or_else(|| payload.series.iter().map(|s| s.asset).collect());
    let summaries = selected
        .into_iter()
        .map(|asset| AssetSummary {
            asset,
            label: asset.label(),
            ticker: asset.ticker(),
            performance: asset_return(&rows, asset),
        })
        .collect();

    Ok(HistoryResponse {
        start_year,
        end_year,
        rows,
        summaries,
    })
}
