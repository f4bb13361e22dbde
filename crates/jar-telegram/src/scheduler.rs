//! Daily delivery timer.
//!
//! A single task sleeps until the next configured wall-clock time in the
//! configured offset, runs the shared pipeline, and repeats. Failures are
//! logged and reported to the user best-effort; the loop never exits on a
//! per-delivery error.

use std::sync::Arc;

use chrono::{DateTime, Days, FixedOffset};
use tracing::{error, info, warn};

use jar_core::config::ScheduleTime;

use crate::state::BotState;

/// Notice sent when a scheduled delivery fails.
const DELIVERY_FAILED_NOTICE: &str =
    "❌ Today's delivery didn't make it out of the jar, but remember: you're still awesome ☀️";

/// Earliest configured time strictly after `now`, today or tomorrow.
///
/// Returns `None` when no times are configured.
pub fn next_fire(
    now: DateTime<FixedOffset>,
    times: &[ScheduleTime],
) -> Option<DateTime<FixedOffset>> {
    let offset = *now.offset();
    let mut best: Option<DateTime<FixedOffset>> = None;

    for day in 0..2u64 {
        let date = now.date_naive() + Days::new(day);
        for t in times {
            let Some(naive) = date.and_hms_opt(t.hour, t.minute, 0) else {
                continue;
            };
            let Some(candidate) = naive.and_local_timezone(offset).single() else {
                continue;
            };
            if candidate > now && best.map_or(true, |b| candidate < b) {
                best = Some(candidate);
            }
        }
    }

    best
}

/// Runs the timer loop until the process exits.
pub async fn run(state: Arc<BotState>) {
    if state.schedule.is_empty() {
        warn!("no schedule times configured, timer not started");
        return;
    }

    loop {
        let now = state.pipeline.local_now();
        let Some(next) = next_fire(now, &state.schedule) else {
            warn!("no upcoming delivery time, timer stopping");
            return;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next = %next, "next scheduled delivery");

        tokio::time::sleep(wait).await;

        match state.pipeline.deliver().await {
            Ok(report) => {
                info!(category = %report.category, slot = ?report.slot, "scheduled delivery sent");
            }
            Err(e) => {
                error!(error = %e, "scheduled delivery failed");
                if let Err(notice_err) = state.pipeline.notify(DELIVERY_FAILED_NOTICE).await {
                    warn!(error = %notice_err, "could not notify user of the failure");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 11, 2, hour, minute, 0)
            .single()
            .unwrap()
    }

    fn times() -> Vec<ScheduleTime> {
        vec![
            ScheduleTime { hour: 8, minute: 0 },
            ScheduleTime { hour: 12, minute: 0 },
            ScheduleTime { hour: 16, minute: 0 },
            ScheduleTime { hour: 20, minute: 0 },
        ]
    }

    #[test]
    fn test_next_fire_same_day() {
        let next = next_fire(at(9, 30), &times()).unwrap();
        assert_eq!(next, at(12, 0));
    }

    #[test]
    fn test_next_fire_skips_exact_now() {
        // A tick exactly at a configured time must pick the following one.
        let next = next_fire(at(12, 0), &times()).unwrap();
        assert_eq!(next, at(16, 0));
    }

    #[test]
    fn test_next_fire_rolls_to_tomorrow() {
        let next = next_fire(at(21, 0), &times()).unwrap();
        assert_eq!(next.date_naive(), at(0, 0).date_naive() + Days::new(1));
        assert_eq!(next.time(), at(8, 0).time());
    }

    #[test]
    fn test_next_fire_empty_schedule() {
        assert!(next_fire(at(9, 0), &[]).is_none());
    }

    #[test]
    fn test_next_fire_unordered_times() {
        let times = vec![
            ScheduleTime { hour: 20, minute: 0 },
            ScheduleTime { hour: 8, minute: 0 },
        ];
        let next = next_fire(at(7, 0), &times).unwrap();
        assert_eq!(next, at(8, 0));
    }
}
