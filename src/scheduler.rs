//! Once-a-day trigger for the recommendation batch.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::matching::MatchPolicy;
use crate::processing::recommendation::generate_daily_recommendations;
use crate::repository::{JobReader, NotificationReader, NotificationWriter, UserReader};

/// Time left until the next `hour:00` UTC strictly after `now`.
///
/// Hours above 23 are clamped to 23.
pub fn duration_until_next_run(now: DateTime<Utc>, hour: u32) -> Duration {
    let run_time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let mut next = now.date_naive().and_time(run_time).and_utc();
    if next <= now {
        next += Duration::days(1);
    }
    next - now
}

/// Run the daily recommendation batch at `hour` UTC, forever.
pub async fn run_daily_recommendations<R>(repo: R, policy: MatchPolicy, hour: u32)
where
    R: UserReader + JobReader + NotificationReader + NotificationWriter,
{
    loop {
        let wait = duration_until_next_run(Utc::now(), hour);
        log::info!(
            "Next daily recommendations run in {}h {}m",
            wait.num_hours(),
            wait.num_minutes() % 60
        );
        tokio::time::sleep(wait.to_std().unwrap_or_default()).await;

        log::info!("Starting daily job recommendations generation");
        match generate_daily_recommendations(Utc::now().naive_utc(), &policy, &repo) {
            Ok(stats) => log::info!(
                "Daily recommendations complete: users_loaded={}, users_skipped={}, users_failed={}, notifications_created={}",
                stats.users_loaded,
                stats.users_skipped,
                stats.users_failed,
                stats.notifications_created
            ),
            Err(error) => log::error!("Daily recommendations failed: {error}"),
        }
    }
}
