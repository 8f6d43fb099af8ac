use actix_web::{error::JsonPayloadError, post, web, HttpRequest, HttpResponse};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::compute_balances;
use crate::breakdown::{compute_breakdown, compute_location_breakdown};
use crate::error::ApiError;
use crate::exchange::SettlementStrategy;
use crate::money::round_currency;
use crate::receipt::ReceiptDraft;
use crate::schemas::{Expense, UserNick};
use crate::trip::Trip;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    message: &'static str,
}

#[derive(Deserialize)]
struct SettlementQuery {
    strategy: Option<SettlementStrategy>,
}

#[derive(Deserialize)]
struct BreakdownQuery {
    location: Option<String>,
}

#[derive(Deserialize)]
struct SaveReceipt {
    trip: Trip,
    receipt: ReceiptDraft,
    #[serde(default)]
    replacing: Option<String>,
}

/// Registers every route under `/api`. `default_strategy` is used when a
/// request doesn't pick one.
pub fn configure(default_strategy: SettlementStrategy) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(default_strategy))
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                ApiError::MalformedBody(err.to_string()).into()
            }))
            .service(
                web::scope("/api")
                    .route("", web::get().to(health_check))
                    .service(calculate)
                    .service(breakdown)
                    .service(balances)
                    .service(save_receipt),
            );
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::MalformedBody(err.to_string()).into()
}

fn validate_expenses(expenses: &[Expense]) -> Result<(), ApiError> {
    for (index, expense) in expenses.iter().enumerate() {
        expense
            .validate()
            .map_err(|source| ApiError::InvalidExpense { index, source })?;
    }
    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(Health {
        status: "healthy",
        message: "Backend is running!",
    })
}

#[post("/calculate")]
async fn calculate(
    default_strategy: web::Data<SettlementStrategy>,
    query: web::Query<SettlementQuery>,
    expenses: web::Json<Vec<Expense>>,
) -> Result<HttpResponse, ApiError> {
    validate_expenses(&expenses)?;
    let strategy = query.strategy.unwrap_or(**default_strategy);
    let settlement = strategy.settle(&expenses);
    Ok(HttpResponse::Ok().json(settlement.descriptions()))
}

#[post("/breakdown")]
async fn breakdown(
    query: web::Query<BreakdownQuery>,
    expenses: web::Json<Vec<Expense>>,
) -> Result<HttpResponse, ApiError> {
    validate_expenses(&expenses)?;
    let breakdown = match &query.location {
        Some(location) => compute_location_breakdown(&expenses, location),
        None => compute_breakdown(&expenses),
    };
    Ok(HttpResponse::Ok().json(breakdown))
}

#[post("/balances")]
async fn balances(expenses: web::Json<Vec<Expense>>) -> Result<HttpResponse, ApiError> {
    validate_expenses(&expenses)?;
    let balances: IndexMap<UserNick, Decimal> = compute_balances(&expenses)
        .into_iter()
        .map(|(person, balance)| (person, round_currency(balance)))
        .collect();
    Ok(HttpResponse::Ok().json(balances))
}

#[post("/trips/receipt")]
async fn save_receipt(body: web::Json<SaveReceipt>) -> Result<HttpResponse, ApiError> {
    let SaveReceipt {
        mut trip,
        receipt,
        replacing,
    } = body.into_inner();
    trip.save_receipt(receipt, replacing.as_deref())?;
    Ok(HttpResponse::Ok().json(trip))
}
