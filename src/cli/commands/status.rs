//! Status command - probe D6 and print a health snapshot

use crate::cli::StatusArgs;
use crate::config::Config;
use crate::error::BridgeResult;
use crate::health::{HealthReporter, HealthSnapshot, HealthStatus};
use crate::resolver::HybridResolver;
use crate::ui::{self, Level, UiContext};

pub async fn execute(args: StatusArgs, config: &Config) -> BridgeResult<()> {
    let resolver = HybridResolver::from_config(config).await?;
    resolver.probe().await;
    let snapshot = HealthReporter::new(&resolver).check().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    render(&UiContext::detect(), config, &snapshot);
    Ok(())
}

fn availability_level(available: bool) -> (&'static str, Level) {
    if available {
        ("available", Level::Ok)
    } else {
        ("unavailable", Level::Warn)
    }
}

fn render(ctx: &UiContext, config: &Config, snapshot: &HealthSnapshot) {
    ui::intro(ctx, "d6bridge status");

    ui::section(ctx, "Upstream");
    ui::key_value(ctx, "Base URL", &config.upstream.base_url);
    if !config.has_credentials() {
        ui::step_warn_hint(
            ctx,
            "No credentials configured",
            "Set D6_API_USERNAME and D6_API_PASSWORD",
        );
    }
    let (v2, v2_level) = availability_level(snapshot.availability.v2_available);
    let (v1, v1_level) = availability_level(snapshot.availability.v1_available);
    ui::key_value_level(ctx, "v2", v2, v2_level);
    ui::key_value_level(ctx, "v1", v1, v1_level);

    ui::section(ctx, "Resolver");
    ui::key_value(ctx, "Mode", snapshot.availability.mode.as_str());
    ui::key_value(
        ctx,
        "Mock data",
        if snapshot.mock_data_available {
            "enabled"
        } else {
            "disabled"
        },
    );
    let served_by = snapshot
        .probe_source
        .map(|s| s.to_string())
        .unwrap_or_else(|| "nothing".to_string());
    ui::key_value(
        ctx,
        "Probe lookup",
        &format!("{} ms via {}", snapshot.response_time_ms, served_by),
    );
    if let Some(ref err) = snapshot.last_error {
        ui::step_error_detail(ctx, "Last error", err);
    }

    ui::section(ctx, "Cache");
    ui::key_value(ctx, "Backend", &snapshot.cache.backend);
    let entries = snapshot
        .cache
        .entries
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    ui::key_value(ctx, "Entries", &entries);

    let (level, message) = match snapshot.status {
        HealthStatus::Healthy => (Level::Ok, "Healthy: D6 is serving requests"),
        HealthStatus::Degraded => (Level::Warn, "Degraded: serving mock data only"),
        HealthStatus::Unhealthy => (Level::Fail, "Unhealthy: no tier can serve requests"),
    };
    ui::outro(ctx, level, message);
}
