use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Notification type used for skills-based job recommendations.
pub const JOB_RECOMMENDATION: &str = "job_recommendation";

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub data: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Notification {
    /// Decode the recommendation payload, if this notification carries one.
    pub fn recommendation_data(&self) -> Option<RecommendationData> {
        let data = self.data.as_deref()?;
        match serde_json::from_str(data) {
            Ok(value) => Some(value),
            Err(error) => {
                log::debug!("Ignoring notification {} payload: {error}", self.id);
                None
            }
        }
    }

    /// The recommended job id, when the payload has one.
    pub fn job_id(&self) -> Option<i32> {
        self.recommendation_data().and_then(|data| data.job_id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewNotification {
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub data: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewNotification {
    /// Build the notification announcing a recommended job.
    pub fn job_recommendation(
        user_id: i32,
        job_id: i32,
        job_title: &str,
        match_score: f32,
        created_at: NaiveDateTime,
    ) -> Self {
        let match_percentage = match_percentage(match_score);
        let data = RecommendationData {
            job_id: Some(job_id),
            job_title: Some(job_title.to_string()),
            match_score: Some(match_score),
            match_percentage: Some(match_percentage),
        };
        Self {
            user_id,
            title: "Recommended Job Match".to_string(),
            message: format!(
                "We found a job that matches your skills: \"{job_title}\" ({match_percentage}% match)"
            ),
            kind: JOB_RECOMMENDATION.to_string(),
            data: serde_json::to_string(&data).ok(),
            created_at,
        }
    }
}

/// JSON payload stored with recommendation notifications.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationData {
    #[serde(default)]
    pub job_id: Option<i32>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub match_score: Option<f32>,
    #[serde(default)]
    pub match_percentage: Option<u32>,
}

/// Whole-number percentage shown to users, truncated like the score display.
pub fn match_percentage(score: f32) -> u32 {
    (score.clamp(0.0, 1.0) * 100.0) as u32
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn job_recommendation_payload_round_trips_through_notification() {
        let new = NewNotification::job_recommendation(7, 42, "Rust Engineer", 0.873, timestamp());
        assert_eq!(new.kind, JOB_RECOMMENDATION);
        assert!(new.message.contains("\"Rust Engineer\" (87% match)"));

        let stored = Notification {
            id: 1,
            user_id: new.user_id,
            title: new.title.clone(),
            message: new.message.clone(),
            kind: new.kind.clone(),
            is_read: false,
            data: new.data.clone(),
            created_at: new.created_at,
        };
        assert_eq!(stored.job_id(), Some(42));
        let data = stored.recommendation_data().expect("payload");
        assert_eq!(data.match_percentage, Some(87));
    }

    #[test]
    fn malformed_payload_has_no_job_id() {
        let stored = Notification {
            id: 2,
            user_id: 1,
            title: String::new(),
            message: String::new(),
            kind: JOB_RECOMMENDATION.to_string(),
            is_read: false,
            data: Some("not json".to_string()),
            created_at: timestamp(),
        };
        assert_eq!(stored.job_id(), None);
    }
}
