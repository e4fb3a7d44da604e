//! Terminal rendering of engine signals.

use exprof_reconcile::{ProfileEngine, Severity, Signal};

fn tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warn",
        Severity::Error => "error",
    }
}

fn detail_lines(signal: &Signal) -> Vec<String> {
    match signal {
        Signal::NeedsEnable { extensions, .. } | Signal::NeedsDisable { extensions, .. } => {
            extensions.iter().map(|e| format!("    {e}")).collect()
        }
        Signal::NeedsSettings { settings, .. } => settings
            .iter()
            .map(|(k, v)| format!("    {k} = {v}"))
            .collect(),
        _ => Vec::new(),
    }
}

/// Render `signals`, running any immediate follow-ups in place.
pub fn render_signals(engine: &ProfileEngine<'_>, signals: &[Signal]) -> Vec<String> {
    let mut out = Vec::new();
    for signal in signals {
        match signal {
            Signal::ExtensionSearch { query, .. } => out.push(format!("[search] {query}")),
            Signal::OpenSettings { query } => out.push(format!("[settings] {query}")),
            Signal::SettingsPreview { profile, document } => {
                out.push(format!("[preview] settings for '{profile}'"));
                out.extend(document.lines().map(|l| format!("    {l}")));
            }
            _ => out.push(format!("[{}] {}", tag(signal.severity()), signal.message())),
        }
        out.extend(detail_lines(signal));
        for offer in signal.offers() {
            out.push(format!("    -> {}", offer.label));
        }
        if let Some(follow_up) = signal.immediate() {
            let follow_on = engine.dispatch(&follow_up);
            out.extend(render_signals(engine, &follow_on));
        }
    }
    out
}

pub fn print_signals(engine: &ProfileEngine<'_>, signals: &[Signal]) {
    for line in render_signals(engine, signals) {
        println!("{line}");
    }
}
