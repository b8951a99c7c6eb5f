//! Probe command - re-check which D6 versions answer

use crate::cli::ProbeArgs;
use crate::config::Config;
use crate::error::BridgeResult;
use crate::probe::ProbeOutcome;
use crate::resolver::HybridResolver;
use crate::ui::{self, Level, TaskSpinner, UiContext};

pub async fn execute(args: ProbeArgs, config: &Config) -> BridgeResult<()> {
    let resolver = HybridResolver::from_config(config).await?;

    if args.json {
        let report = resolver.probe().await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Probing {}", config.upstream.base_url));
    let report = resolver.probe().await;
    if report.state.any_upstream() {
        spinner.stop("D6 reachable");
    } else {
        spinner.stop_warn("No D6 version reachable");
    }

    for probe in &report.versions {
        let level = match probe.outcome {
            ProbeOutcome::Available => Level::Ok,
            ProbeOutcome::RouteNotFound | ProbeOutcome::Unconfigured => Level::Warn,
            ProbeOutcome::Failed(_) => Level::Fail,
        };
        ui::key_value_level(
            &ctx,
            probe.version.as_str(),
            &format!("{} ({} ms)", probe.outcome, probe.elapsed_ms),
            level,
        );
    }

    if !config.has_credentials() {
        ui::remark(&ctx, "Set D6_API_USERNAME and D6_API_PASSWORD to probe D6");
    }
    Ok(())
}
