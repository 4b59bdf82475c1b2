//! Report commands: player trends, team reports, notable shifts

use anyhow::Result;
use chrono::Utc;
use coachpulse_core::RosterIndex;
use coachpulse_trends::{TeamReport, TrendAggregator, TrendDirection, TrendResult};

fn direction_label(trend: TrendDirection) -> &'static str {
    match trend {
        TrendDirection::Improving => "IMPROVING",
        TrendDirection::Declining => "DECLINING",
        TrendDirection::Stable => "STABLE",
    }
}

fn print_trend(result: &TrendResult) {
    let fmt_avg = |avg: Option<f64>| match avg {
        Some(v) => format!("{v:+.2}"),
        None => "n/a".to_string(),
    };
    println!(
        "{}: {}{} (recent {} | prior {} | {} samples)",
        result.player_name,
        direction_label(result.trend),
        if result.insufficient_data {
            " [insufficient data]"
        } else {
            ""
        },
        fmt_avg(result.recent_avg),
        fmt_avg(result.prior_avg),
        result.sample_count
    );
}

pub async fn player(aggregator: &TrendAggregator, name: &str, json: bool) -> Result<()> {
    let result = aggregator.compute_trend(name, Utc::now()).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_trend(&result);
    }
    Ok(())
}

pub async fn team(
    aggregator: &TrendAggregator,
    roster: &RosterIndex,
    name: &str,
    json: bool,
) -> Result<()> {
    let report = aggregator.team_report(name, roster, Utc::now()).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print_team(&report);
    Ok(())
}

fn print_team(report: &TeamReport) {
    println!("{} (roster {})", report.team, report.roster_version);
    println!("Favorites:");
    for result in &report.favorites {
        print!("  ");
        print_trend(result);
    }
    if report.favorites.is_empty() {
        println!("  none detected");
    }
    println!("Watch list:");
    for result in &report.watch_list {
        print!("  ");
        print_trend(result);
    }
    if report.watch_list.is_empty() {
        println!("  none detected");
    }
}

/// Combined report across every rostered team
pub async fn league(aggregator: &TrendAggregator, roster: &RosterIndex, json: bool) -> Result<()> {
    let reports = aggregator.league_report(roster, Utc::now()).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_team(report);
    }
    Ok(())
}

pub async fn shifts(aggregator: &TrendAggregator, min_shift: f64, json: bool) -> Result<()> {
    let shifts = aggregator.notable_shifts(Utc::now(), min_shift).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&shifts)?);
        return Ok(());
    }

    if shifts.is_empty() {
        println!("No shifts at or above {min_shift:.2}");
        return Ok(());
    }
    for shift in &shifts {
        println!(
            "{}: {} by {:.2} (recent {:+.2} | prior {:+.2} | {} samples)",
            shift.player_name,
            direction_label(shift.trend),
            shift.magnitude,
            shift.recent_avg,
            shift.prior_avg,
            shift.sample_count
        );
    }
    Ok(())
}
