//! Lazy expiry evaluation.
//!
//! Expiry is never driven by a timer. Every read and every transition asks
//! [`resolve_status`] what the job's status is at `now`, so an overdue job is
//! reported as `expired` from the first observation after its deadline.

use chrono::{DateTime, Utc};

use crate::domain::{Job, JobStatus};

/// Status a job should be observed in at `now`.
///
/// Terminal statuses are returned unchanged. Any other status becomes
/// [`JobStatus::Expired`] once `now` is strictly after the deadline. The
/// result is monotone in `now`: once expired, later instants stay expired.
pub fn resolve_status(job: &Job, now: DateTime<Utc>) -> JobStatus {
    let status = job.status();
    if status.is_terminal() || status == JobStatus::Expired {
        return status;
    }
    if now > job.expires_at() {
        JobStatus::Expired
    } else {
        status
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use rstest::rstest;

    use super::*;
    use crate::domain::job::{DEFAULT_JOB_LIFETIME, JobCategory, JobDraft, JobId, LocationDraft};
    use crate::domain::UserId;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn job() -> Job {
        Job::create(
            JobId::random(),
            UserId::random(),
            JobDraft {
                title: "Assemble wardrobe".to_owned(),
                description: "Flat pack, two doors".to_owned(),
                category: JobCategory::Assembly,
                reward: 40.0,
                location: LocationDraft {
                    address: "5 Mill Lane".to_owned(),
                    longitude: 2.35,
                    latitude: 48.85,
                },
                time_estimate: "3 hours".to_owned(),
                expires_at: None,
            },
            created_at(),
            DEFAULT_JOB_LIFETIME,
        )
        .expect("valid draft")
    }

    #[rstest]
    #[case(TimeDelta::zero(), JobStatus::Open)]
    #[case(DEFAULT_JOB_LIFETIME, JobStatus::Open)]
    #[case(DEFAULT_JOB_LIFETIME + TimeDelta::milliseconds(1), JobStatus::Expired)]
    #[case(DEFAULT_JOB_LIFETIME * 4, JobStatus::Expired)]
    fn deadline_is_exclusive(#[case] elapsed: TimeDelta, #[case] expected: JobStatus) {
        assert_eq!(resolve_status(&job(), created_at() + elapsed), expected);
    }

    #[rstest]
    fn expiry_is_monotone() {
        let job = job();
        let mut seen_expired = false;
        for hours in (0..=24 * 9).step_by(6) {
            let status = resolve_status(&job, created_at() + TimeDelta::hours(hours));
            if seen_expired {
                assert_eq!(status, JobStatus::Expired);
            }
            seen_expired |= status == JobStatus::Expired;
        }
        assert!(seen_expired);
    }

    #[rstest]
    fn refreshed_job_stays_expired() {
        let mut job = job();
        let late = job.expires_at() + TimeDelta::hours(1);

        assert!(job.refresh_expiry(late));
        assert!(!job.refresh_expiry(late + TimeDelta::days(1)));
        assert_eq!(resolve_status(&job, late), JobStatus::Expired);
    }
}
