//! Styled operator output with a plain fallback for pipes and CI

use super::context::UiContext;
use console::{style, Style};

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Warn,
    Fail,
}

impl Level {
    fn tag(&self) -> &'static str {
        match self {
            Level::Ok => "[OK]",
            Level::Warn => "[WARN]",
            Level::Fail => "[FAIL]",
        }
    }

    fn style(&self) -> Style {
        match self {
            Level::Ok => Style::new().green(),
            Level::Warn => Style::new().yellow(),
            Level::Fail => Style::new().red(),
        }
    }
}

pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{}", style(title).cyan().bold());
        println!();
    }
}

/// Closing line; tone follows `level`
pub fn outro(ctx: &UiContext, level: Level, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(level.style().bold().apply_to(message)).ok();
    } else {
        println!();
        println!("{} {}", level.style().apply_to(level.tag()), message);
    }
}

pub fn section(ctx: &UiContext, title: &str) {
    println!();
    if ctx.use_fancy_output() {
        cliclack::log::info(style(title).bold()).ok();
    } else {
        println!("{}", style(title).bold());
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::success(message).ok();
    } else {
        println!("  {} {}", style("[OK]").green(), message);
    }
}

pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::success(format!("{} ({})", message, style(detail).dim())).ok();
    } else {
        println!("  {} {} ({})", style("[OK]").green(), message, detail);
    }
}

pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::warning(format!("{} - {}", message, style(hint).dim())).ok();
    } else {
        println!("  {} {} - {}", style("[WARN]").yellow(), message, hint);
    }
}

pub fn step_error_detail(ctx: &UiContext, message: &str, detail: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::error(format!("{}: {}", message, style(detail).red())).ok();
    } else {
        println!("  {} {}: {}", style("[FAIL]").red(), message, detail);
    }
}

pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(message).ok();
    } else {
        println!("  {}", style(message).dim());
    }
}

pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// Key-value line coloured by severity; plain mode prefixes the tag
pub fn key_value_level(ctx: &UiContext, key: &str, value: &str, level: Level) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), level.style().apply_to(value));
    } else {
        println!("  {} {}: {}", level.tag(), key, value);
    }
}
