use ansi_term::{ANSIString, Colour};
use chrono::Duration;

use crate::{
    daemon::{storage::snapshot::Snapshot, tracking::classify::Category},
    utils::time::{format_clock, format_duration},
};

/// Renders what the popup's tracker tab showed: tracking state, the running
/// timer, the session table sorted by accumulated time and the daily totals.
pub fn print_status(snapshot: &Snapshot) {
    let state = if snapshot.enabled {
        Colour::Green.paint("tracking")
    } else {
        Colour::Yellow.paint("paused")
    };
    println!("State:\t{state}");
    println!("Timer:\t{}", format_clock(snapshot.timer_seconds));
    match &snapshot.current_domain {
        Some(domain) => println!("Site:\t{domain}"),
        None => println!("Site:\t-"),
    }

    let mut sessions = snapshot.sessions.iter().collect::<Vec<_>>();
    sessions.sort_by(|a, b| b.1.time.cmp(&a.1.time));

    if !sessions.is_empty() {
        println!();
        for (domain, entry) in sessions {
            println!(
                "{}\t{}\t{}",
                format_duration(Duration::seconds(entry.time as i64)),
                paint_category(entry.category),
                domain
            );
        }
    }

    let daily = &snapshot.daily_totals;
    println!();
    println!(
        "Today ({}):\t{} productive, {} unproductive, {} neutral",
        snapshot.day.format("%Y-%m-%d"),
        format_duration(Duration::seconds(daily.productive as i64)),
        format_duration(Duration::seconds(daily.unproductive as i64)),
        format_duration(Duration::seconds(daily.neutral as i64)),
    );
    println!("Productivity score:\t{}%", daily.productivity_score());
}

fn paint_category(category: Category) -> ANSIString<'static> {
    match category {
        Category::Productive => Colour::Green.paint("productive"),
        Category::Unproductive => Colour::Red.paint("unproductive"),
        Category::Neutral => Colour::White.paint("neutral"),
    }
}
