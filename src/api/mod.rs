mod error;
mod report;

use axum::{
    Router,
    extract::{Json, Query},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info};

pub use error::{ApiError, ApiResult};
pub use report::render_report;

use crate::core::rates::{
    ALLOWANCE_TAPER_THRESHOLD, CORPORATION_TAX_LOWER_LIMIT, CORPORATION_TAX_MAIN_RATE,
    CORPORATION_TAX_SMALL_PROFITS_RATE, CORPORATION_TAX_UPPER_LIMIT, DIRECTOR_SALARY,
    DIVIDEND_ADDITIONAL_RATE, DIVIDEND_ALLOWANCE, DIVIDEND_BASIC_RATE, DIVIDEND_HIGHER_RATE,
    EMPLOYEE_NI_BANDS, EMPLOYER_NI_BANDS, MARGINAL_RELIEF_FRACTION,
};
use crate::core::{
    CalculationResult, EmploymentType, GrossIncomeSource, Location, RateBand, ScenarioInput,
    StudentLoanPlan, run_scenarios,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliEmploymentType {
    Permanent,
    Contract,
}

impl From<CliEmploymentType> for EmploymentType {
    fn from(value: CliEmploymentType) -> Self {
        match value {
            CliEmploymentType::Permanent => EmploymentType::Permanent,
            CliEmploymentType::Contract => EmploymentType::Contract,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliLocation {
    England,
    Scotland,
}

impl From<CliLocation> for Location {
    fn from(value: CliLocation) -> Self {
        match value {
            CliLocation::England => Location::England,
            CliLocation::Scotland => Location::Scotland,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliStudentLoanPlan {
    None,
    Plan1,
    Plan2,
    Plan4,
    Plan5,
    Postgraduate,
}

impl From<CliStudentLoanPlan> for StudentLoanPlan {
    fn from(value: CliStudentLoanPlan) -> Self {
        match value {
            CliStudentLoanPlan::None => StudentLoanPlan::None,
            CliStudentLoanPlan::Plan1 => StudentLoanPlan::Plan1,
            CliStudentLoanPlan::Plan2 => StudentLoanPlan::Plan2,
            CliStudentLoanPlan::Plan4 => StudentLoanPlan::Plan4,
            CliStudentLoanPlan::Plan5 => StudentLoanPlan::Plan5,
            CliStudentLoanPlan::Postgraduate => StudentLoanPlan::Postgraduate,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiEmploymentType {
    #[serde(alias = "perm")]
    Permanent,
    #[serde(alias = "contractor")]
    Contract,
}

impl From<ApiEmploymentType> for CliEmploymentType {
    fn from(value: ApiEmploymentType) -> Self {
        match value {
            ApiEmploymentType::Permanent => CliEmploymentType::Permanent,
            ApiEmploymentType::Contract => CliEmploymentType::Contract,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiLocation {
    #[serde(alias = "wales", alias = "northern-ireland")]
    England,
    Scotland,
}

impl From<ApiLocation> for CliLocation {
    fn from(value: ApiLocation) -> Self {
        match value {
            ApiLocation::England => CliLocation::England,
            ApiLocation::Scotland => CliLocation::Scotland,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiStudentLoanPlan {
    #[serde(alias = "")]
    None,
    #[serde(alias = "plan-1", alias = "plan_1")]
    Plan1,
    #[serde(alias = "plan-2", alias = "plan_2")]
    Plan2,
    #[serde(alias = "plan-4", alias = "plan_4")]
    Plan4,
    #[serde(alias = "plan-5", alias = "plan_5")]
    Plan5,
    #[serde(alias = "pg", alias = "postgrad")]
    Postgraduate,
}

impl From<ApiStudentLoanPlan> for CliStudentLoanPlan {
    fn from(value: ApiStudentLoanPlan) -> Self {
        match value {
            ApiStudentLoanPlan::None => CliStudentLoanPlan::None,
            ApiStudentLoanPlan::Plan1 => CliStudentLoanPlan::Plan1,
            ApiStudentLoanPlan::Plan2 => CliStudentLoanPlan::Plan2,
            ApiStudentLoanPlan::Plan4 => CliStudentLoanPlan::Plan4,
            ApiStudentLoanPlan::Plan5 => CliStudentLoanPlan::Plan5,
            ApiStudentLoanPlan::Postgraduate => CliStudentLoanPlan::Postgraduate,
        }
    }
}

/// A numeric form value. Form fields arrive as numbers or raw strings;
/// anything that does not parse to a finite number counts as 0.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    fn coerce(&self) -> f64 {
        let value = match self {
            NumericInput::Number(v) => *v,
            NumericInput::Text(s) => s.trim().parse().unwrap_or(0.0),
        };
        finite_or_zero(value)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    #[serde(alias = "incomeType")]
    employment_type: Option<ApiEmploymentType>,
    annual_salary: Option<NumericInput>,
    day_rate: Option<NumericInput>,
    weeks_per_year: Option<NumericInput>,
    location: Option<ApiLocation>,
    student_loan: Option<ApiStudentLoanPlan>,
    pension_contribution: Option<NumericInput>,
    #[serde(alias = "employerNI")]
    employer_ni: Option<bool>,
    umbrella_fee: Option<NumericInput>,
    business_expenses: Option<NumericInput>,
}

#[derive(Parser, Debug)]
#[command(
    name = "takehome",
    about = "UK take-home pay calculator (permanent PAYE, inside IR35 umbrella, outside IR35 limited company)"
)]
struct Cli {
    #[arg(long, value_enum, default_value_t = CliEmploymentType::Permanent)]
    employment_type: CliEmploymentType,
    #[arg(
        long,
        default_value_t = 80000.0,
        help = "Annual salary, used for permanent employment"
    )]
    annual_salary: f64,
    #[arg(long, default_value_t = 600.0, help = "Contract day rate")]
    day_rate: f64,
    #[arg(
        long,
        default_value_t = 48.0,
        help = "Working weeks per year at five days a week"
    )]
    weeks_per_year: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliLocation::England,
        help = "Location for income tax purposes"
    )]
    location: CliLocation,
    #[arg(long, value_enum, default_value_t = CliStudentLoanPlan::None)]
    student_loan: CliStudentLoanPlan,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Pension contribution in percent of pay"
    )]
    pension_contribution: f64,
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        help = "Inside IR35: whether employer's NI is deducted from the contractor's rate"
    )]
    employer_ni: bool,
    #[arg(
        long,
        default_value_t = 100.0,
        help = "Inside IR35: monthly umbrella company fee"
    )]
    umbrella_fee: f64,
    #[arg(
        long,
        default_value_t = 10000.0,
        help = "Outside IR35: annual business expenses"
    )]
    business_expenses: f64,
    #[arg(long, help = "Print the breakdown as JSON instead of a text report")]
    json: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct CalculationRequest {
    employment_type: EmploymentType,
    gross_source: GrossIncomeSource,
    input: ScenarioInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioResponse {
    title: &'static str,
    #[serde(flatten)]
    result: CalculationResult,
    net_monthly: f64,
    net_weekly: f64,
}

impl From<CalculationResult> for ScenarioResponse {
    fn from(result: CalculationResult) -> Self {
        ScenarioResponse {
            title: result.scenario.title(),
            net_monthly: result.net_monthly(),
            net_weekly: result.net_weekly(),
            result,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    employment_type: EmploymentType,
    gross_income: f64,
    #[serde(rename = "employerNI")]
    employer_ni: bool,
    results: Vec<ScenarioResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BandResponse {
    label: &'static str,
    upper_limit: Option<f64>,
    rate: f64,
}

impl From<&RateBand> for BandResponse {
    fn from(band: &RateBand) -> Self {
        BandResponse {
            label: band.label,
            upper_limit: band.upper_limit.is_finite().then_some(band.upper_limit),
            rate: band.rate,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StudentLoanResponse {
    plan: StudentLoanPlan,
    threshold: f64,
    rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CorporationTaxResponse {
    small_profits_rate: f64,
    main_rate: f64,
    lower_limit: f64,
    upper_limit: f64,
    marginal_relief_fraction: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DividendResponse {
    allowance: f64,
    basic_rate: f64,
    higher_rate: f64,
    additional_rate: f64,
    director_salary: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RatesResponse {
    allowance_taper_threshold: f64,
    england: Vec<BandResponse>,
    scotland: Vec<BandResponse>,
    #[serde(rename = "employeeNI")]
    employee_ni: Vec<BandResponse>,
    #[serde(rename = "employerNI")]
    employer_ni: Vec<BandResponse>,
    student_loans: Vec<StudentLoanResponse>,
    corporation_tax: CorporationTaxResponse,
    dividend: DividendResponse,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_request(cli: &Cli) -> CalculationRequest {
    let employment_type: EmploymentType = cli.employment_type.into();
    let gross_source = match employment_type {
        EmploymentType::Permanent => {
            GrossIncomeSource::AnnualSalary(finite_or_zero(cli.annual_salary))
        }
        EmploymentType::Contract => GrossIncomeSource::DayRate {
            day_rate: finite_or_zero(cli.day_rate),
            weeks_per_year: finite_or_zero(cli.weeks_per_year),
        },
    };

    CalculationRequest {
        employment_type,
        gross_source,
        input: ScenarioInput {
            gross_income: gross_source.annual_gross(),
            location: cli.location.into(),
            student_loan_plan: cli.student_loan.into(),
            pension_contribution_percent: finite_or_zero(cli.pension_contribution),
            employer_ni_borne: cli.employer_ni,
            monthly_umbrella_fee: finite_or_zero(cli.umbrella_fee),
            annual_business_expenses: finite_or_zero(cli.business_expenses),
        },
    }
}

fn calculate(request: &CalculationRequest) -> CalculateResponse {
    debug!(
        employment_type = ?request.employment_type,
        gross_income = request.input.gross_income,
        location = ?request.input.location,
        "calculating take-home pay"
    );

    CalculateResponse {
        employment_type: request.employment_type,
        gross_income: request.input.gross_income,
        employer_ni: request.input.employer_ni_borne,
        results: run_scenarios(request.employment_type, &request.input)
            .into_iter()
            .map(ScenarioResponse::from)
            .collect(),
    }
}

/// Runs a single calculation from command-line arguments and returns the
/// rendered output.
pub fn run_cli<I, T>(args: I) -> ApiResult<String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let request = build_request(&cli);

    if cli.json {
        let response = calculate(&request);
        return Ok(serde_json::to_string_pretty(&response)?);
    }

    let results = run_scenarios(request.employment_type, &request.input);
    Ok(render_report(&results, request.input.employer_ni_borne))
}

pub async fn run_http_server(port: u16) -> ApiResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/rates", get(rates_handler))
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "take-home pay API listening");
    info!("Local access: http://127.0.0.1:{port}/api/calculate");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn rates_handler() -> Response {
    json_response(StatusCode::OK, build_rates_response())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_get_handler(Query(payload): Query<CalculatePayload>) -> Response {
    calculate_handler_impl(payload)
}

async fn calculate_post_handler(Json(payload): Json<CalculatePayload>) -> Response {
    calculate_handler_impl(payload)
}

fn calculate_handler_impl(payload: CalculatePayload) -> Response {
    let request = request_from_payload(payload);
    json_response(StatusCode::OK, calculate(&request))
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

#[cfg(test)]
fn request_from_json(json: &str) -> ApiResult<CalculationRequest> {
    let payload = serde_json::from_str::<CalculatePayload>(json)?;
    Ok(request_from_payload(payload))
}

fn request_from_payload(payload: CalculatePayload) -> CalculationRequest {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.employment_type {
        cli.employment_type = v.into();
    }
    if let Some(v) = payload.annual_salary {
        cli.annual_salary = v.coerce();
    }
    if let Some(v) = payload.day_rate {
        cli.day_rate = v.coerce();
    }
    if let Some(v) = payload.weeks_per_year {
        cli.weeks_per_year = v.coerce();
    }
    if let Some(v) = payload.location {
        cli.location = v.into();
    }
    if let Some(v) = payload.student_loan {
        cli.student_loan = v.into();
    }
    if let Some(v) = payload.pension_contribution {
        cli.pension_contribution = v.coerce();
    }
    if let Some(v) = payload.employer_ni {
        cli.employer_ni = v;
    }
    if let Some(v) = payload.umbrella_fee {
        cli.umbrella_fee = v.coerce();
    }
    if let Some(v) = payload.business_expenses {
        cli.business_expenses = v.coerce();
    }

    build_request(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        employment_type: CliEmploymentType::Permanent,
        annual_salary: 80_000.0,
        day_rate: 600.0,
        weeks_per_year: 48.0,
        location: CliLocation::England,
        student_loan: CliStudentLoanPlan::None,
        pension_contribution: 5.0,
        employer_ni: true,
        umbrella_fee: 100.0,
        business_expenses: 10_000.0,
        json: false,
    }
}

fn build_rates_response() -> RatesResponse {
    let bands = |table: &[RateBand]| table.iter().map(BandResponse::from).collect::<Vec<_>>();
    let student_loans = [
        StudentLoanPlan::Plan1,
        StudentLoanPlan::Plan2,
        StudentLoanPlan::Plan4,
        StudentLoanPlan::Plan5,
        StudentLoanPlan::Postgraduate,
    ]
    .into_iter()
    .filter_map(|plan| {
        plan.terms().map(|terms| StudentLoanResponse {
            plan,
            threshold: terms.threshold,
            rate: terms.rate,
        })
    })
    .collect();

    RatesResponse {
        allowance_taper_threshold: ALLOWANCE_TAPER_THRESHOLD,
        england: bands(Location::England.tax_bands()),
        scotland: bands(Location::Scotland.tax_bands()),
        employee_ni: bands(&EMPLOYEE_NI_BANDS),
        employer_ni: bands(&EMPLOYER_NI_BANDS),
        student_loans,
        corporation_tax: CorporationTaxResponse {
            small_profits_rate: CORPORATION_TAX_SMALL_PROFITS_RATE,
            main_rate: CORPORATION_TAX_MAIN_RATE,
            lower_limit: CORPORATION_TAX_LOWER_LIMIT,
            upper_limit: CORPORATION_TAX_UPPER_LIMIT,
            marginal_relief_fraction: MARGINAL_RELIEF_FRACTION,
        },
        dividend: DividendResponse {
            allowance: DIVIDEND_ALLOWANCE,
            basic_rate: DIVIDEND_BASIC_RATE,
            higher_rate: DIVIDEND_HIGHER_RATE,
            additional_rate: DIVIDEND_ADDITIONAL_RATE,
            director_salary: DIRECTOR_SALARY,
        },
    }
}
