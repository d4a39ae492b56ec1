use marketsense_core::domain::outlook::UserRole;
use marketsense_core::domain::series::Granularity;
use marketsense_core::pipeline::PipelineReport;
use std::fmt::Write;

const TIMEFRAMES: [Granularity; 4] = [
    Granularity::Daily,
    Granularity::Monthly,
    Granularity::Quarterly,
    Granularity::Yearly,
];

pub fn index_display_name(symbol: &str) -> &str {
    match symbol {
        "^NSEI" => "NIFTY 50",
        "^BSESN" => "SENSEX",
        "^NSEBANK" => "NIFTY BANK",
        other => other,
    }
}

/// Plain-text dashboard: headline metrics, sentiment panel, timeframe summary and alert.
pub fn render_text(report: &PipelineReport, role: UserRole) -> String {
    let mut out = String::new();
    let o = &report.outlook;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "MarketSense | viewing as {}", role.label());
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<26}{:>12.2}  (as of {})",
        format!("Index: {}", index_display_name(&report.request.symbol)),
        o.latest_close,
        report.latest_date
    );
    let _ = writeln!(
        out,
        "{:<26}{:>12.2}  {:+.1}%",
        "AI Prediction (Next Day)",
        o.predicted_next,
        o.change_pct()
    );
    let _ = writeln!(
        out,
        "{:<26}{:>12}  Score: {:.2}",
        "Sentiment Pulse", report.sentiment.label, report.sentiment.score
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Today's Analysis: Market sentiment is {}.",
        report.sentiment.label
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Multi-Timeframe Market Analysis");

    for g in TIMEFRAMES {
        match report.timeframe(g) {
            Ok(points) => {
                let first = &points[0];
                let last = &points[points.len() - 1];
                let _ = writeln!(
                    out,
                    "  {:<10}{:>5} bars  {} .. {}  last close {:.2}",
                    g.as_str(),
                    points.len(),
                    first.timestamp,
                    last.timestamp,
                    last.close
                );
            }
            Err(_) => {
                let _ = writeln!(out, "  {:<10}No data available for {} View", g.as_str(), g);
            }
        }
    }

    let _ = writeln!(out);
    let _ = write!(out, "Risk Monitor: {}", o.alert_level.message());
    out
}
