// --- File: crates/vetclinic_stats/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    ActivityStats, ClinicStats, CustomerStats, RevenueStats, SpecialtyStats, StatsPeriod,
    StatsQuery, StatsWindow, SubscriptionStats,
};

#[utoipa::path(
    get,
    path = "/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Clinic statistics for the period", body = ClinicStats),
        (status = 400, description = "Invalid period"),
        (status = 403, description = "Missing stats.read permission")
    ),
    tag = "Statistics"
)]
fn doc_get_stats_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_get_stats_handler),
    components(schemas(
        ClinicStats,
        StatsPeriod,
        StatsWindow,
        CustomerStats,
        SubscriptionStats,
        RevenueStats,
        SpecialtyStats,
        ActivityStats
    )),
    tags((name = "Statistics", description = "Usage and revenue figures per clinic"))
)]
pub struct StatsApiDoc;
