//! Cache command - inspect or clear cached resolutions

use crate::cache::{create_store, ResolverCache, TtlPolicy};
use crate::cli::{CacheAction, CacheArgs};
use crate::config::Config;
use crate::error::BridgeResult;
use crate::resolver::CACHE_NAMESPACE;
use crate::ui::{self, UiContext};

pub async fn execute(args: CacheArgs, config: &Config) -> BridgeResult<()> {
    let store = create_store(config).await?;
    let cache = ResolverCache::new(store, TtlPolicy::from_config(&config.cache));

    match args.action {
        CacheAction::Stats { json } => show_stats(&cache, config, json).await,
        CacheAction::Clear { prefix, yes } => clear(&cache, prefix, yes).await,
    }
}

async fn show_stats(cache: &ResolverCache, config: &Config, json: bool) -> BridgeResult<()> {
    let stats = cache.stats().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let ctx = UiContext::detect();
    ui::section(&ctx, "Cache");
    ui::key_value(&ctx, "Backend", &stats.backend);
    ui::key_value(
        &ctx,
        "Entries",
        &stats
            .entries
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    );
    ui::key_value(
        &ctx,
        "Real data TTL",
        &format!("{}s", config.cache.real_data_ttl_secs),
    );
    ui::key_value(
        &ctx,
        "Mock data TTL",
        &format!("{}s", config.cache.mock_data_ttl_secs),
    );
    Ok(())
}

async fn clear(cache: &ResolverCache, prefix: Option<String>, yes: bool) -> BridgeResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);
    let prefix = prefix.unwrap_or_else(|| format!("{}:", CACHE_NAMESPACE));

    let question = format!("Remove cached entries matching '{}*'?", prefix);
    if !ui::confirm(&ctx, &question, false).await? {
        ui::remark(&ctx, "Nothing removed (use --yes to skip the prompt)");
        return Ok(());
    }

    let removed = cache.invalidate_prefix(&prefix).await;
    ui::step_ok_detail(&ctx, &format!("Removed {} entries", removed), &prefix);
    Ok(())
}
