// Demonstration harness: seeds a small market, drives each detection rule
// once, then prints the report.

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use vigil_application::commands::{surveillance_commands, update_commands};
use vigil_application::dtos::ItemUpdateApi;
use vigil_application::queries::market_queries;
use vigil_application::{AppError, AppState};
use vigil_domain::SuspiciousActivity;
use vigil_infrastructure::report::{self, MarketReport};
use vigil_infrastructure::AppConfig;

use crate::AppContext;

pub fn run_demo() -> Result<()> {
    let context = AppContext::new()?;
    let report = run_scenario(&context.state, &context.config)?;

    if context.config.json_output {
        println!("{}", report::render_json(&report)?);
    } else {
        println!("{}", report::render_report(&report));
        println!("{}", context.state.metrics.render_prometheus());
    }

    if let Some(path) = &context.config.export_path {
        report::write_json_export(path, &report.findings)?;
        info!("exported {} findings to {}", report.findings.len(), path);
    }
    Ok(())
}

pub fn run_scenario(state: &AppState, config: &AppConfig) -> Result<MarketReport> {
    info!(
        "seeding market: {} traders x {} updates",
        config.trader_count, config.updates_per_trader
    );
    seed_market(state, config)?;

    let spike = drive_price_spike(state)?;
    let hoard = drive_hoard(state)?;
    let burst = drive_update_burst(state, config.burst_size)?;
    info!(
        "detection pass produced {} finding(s)",
        spike.len() + hoard.len() + usize::from(burst.is_some())
    );

    if let Some(relic) = state.ledger.get_item("relic") {
        let history = market_queries::item_price_history(state, "relic")?;
        info!(
            "relic now trades at {} after {} recorded prices",
            relic.price,
            history.len()
        );
    }
    let observations = market_queries::full_price_history(state)?;
    info!("ledger holds {} price observations", observations.len());

    if update_commands::remove_item(state, "flip_0")? {
        info!("delisted flip_0; its price history stays on record");
    }

    let purged = surveillance_commands::purge_stale_activities(state, config.purge_max_age_ms)?;
    info!(
        "purged {} finding(s) older than {}ms",
        purged, config.purge_max_age_ms
    );

    report::build_report(state, config.stats_window_ms, config.report_min_severity)
}

// Background traffic: steady stalls with small price drift, loud enough to
// fill the ledger but never enough to trip a rule.
fn seed_market(state: &AppState, config: &AppConfig) -> Result<()> {
    let mut workers = Vec::new();
    for trader in 0..config.trader_count {
        let state = state.clone();
        let updates = config.updates_per_trader;
        let builder = std::thread::Builder::new().name(format!("trader-{trader}"));
        workers.push(builder.spawn(move || seed_trader(&state, trader, updates))?);
    }
    for worker in workers {
        match worker.join() {
            Ok(result) => result?,
            Err(_) => return Err(anyhow!("trader thread panicked")),
        }
    }
    Ok(())
}

fn seed_trader(state: &AppState, trader: usize, updates: usize) -> Result<(), AppError> {
    let owner = format!("trader_{trader}");
    for round in 0..updates {
        let slot = round % 4;
        let base = 40 + 10 * trader as i64 + 5 * slot as i64;
        let price = Decimal::from(base + (round as i64 % 3));
        update_commands::record_item_update(
            state,
            ItemUpdateApi {
                id: format!("stall_{trader}_{slot}"),
                name: format!("Stall {trader}-{slot} Goods"),
                price,
                quantity: 10 + round as u64,
                owner: owner.clone(),
            },
        )?;
    }
    Ok(())
}

fn drive_price_spike(state: &AppState) -> Result<Vec<SuspiciousActivity>> {
    let relic = |price| ItemUpdateApi {
        id: "relic".to_string(),
        name: "Ancient Relic".to_string(),
        price,
        quantity: 1,
        owner: "baron".to_string(),
    };
    update_commands::record_item_update(state, relic(dec!(50)))?;
    Ok(update_commands::record_item_update(state, relic(dec!(500)))?)
}

fn drive_hoard(state: &AppState) -> Result<Vec<SuspiciousActivity>> {
    Ok(update_commands::record_item_update(
        state,
        ItemUpdateApi {
            id: "cobble".to_string(),
            name: "Cobblestone".to_string(),
            price: dec!(1),
            quantity: 999_999,
            owner: "hoarder".to_string(),
        },
    )?)
}

fn drive_update_burst(
    state: &AppState,
    burst_size: usize,
) -> Result<Option<SuspiciousActivity>> {
    for i in 0..burst_size {
        update_commands::record_item_update(
            state,
            ItemUpdateApi {
                id: format!("flip_{i}"),
                name: format!("Flip Lot {i}"),
                price: dec!(5),
                quantity: 1,
                owner: "flash".to_string(),
            },
        )?;
    }
    Ok(surveillance_commands::scan_rapid_updates(state, "flash")?)
}
