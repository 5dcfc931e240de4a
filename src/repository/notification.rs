use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::notification::JOB_RECOMMENDATION;
use crate::domain::{NewNotification, Notification};
use crate::models::notification::{
    NewNotification as DbNewNotification, Notification as DbNotification,
};
use crate::repository::{DieselRepository, NotificationReader, NotificationWriter, RepositoryResult};

impl NotificationReader for DieselRepository {
    fn list_recommendations_between(
        &self,
        user_id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<Notification>> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;

        let result = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::kind.eq(JOB_RECOMMENDATION))
            .filter(notifications::created_at.ge(start))
            .filter(notifications::created_at.lt(end))
            .order(notifications::id.asc())
            .select(DbNotification::as_select())
            .load::<DbNotification>(&mut conn)?;

        Ok(result.into_iter().map(Notification::from).collect())
    }

    fn list_unread_recommendations(&self, user_id: i32) -> RepositoryResult<Vec<Notification>> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;

        let result = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::kind.eq(JOB_RECOMMENDATION))
            .filter(notifications::is_read.eq(false))
            .order(notifications::id.asc())
            .select(DbNotification::as_select())
            .load::<DbNotification>(&mut conn)?;

        Ok(result.into_iter().map(Notification::from).collect())
    }
}

impl NotificationWriter for DieselRepository {
    fn create_notifications(
        &self,
        new_notifications: &[NewNotification],
    ) -> RepositoryResult<usize> {
        use crate::schema::notifications;

        if new_notifications.is_empty() {
            return Ok(0);
        }

        let rows: Vec<DbNewNotification> = new_notifications
            .iter()
            .cloned()
            .map(DbNewNotification::from)
            .collect();

        let mut conn = self.conn()?;

        let inserted = diesel::insert_into(notifications::table)
            .values(&rows)
            .execute(&mut conn)?;

        Ok(inserted)
    }

    fn mark_notifications_read(&self, notification_ids: &[i32]) -> RepositoryResult<usize> {
        use crate::schema::notifications;

        if notification_ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        let affected = diesel::update(
            notifications::table.filter(notifications::id.eq_any(notification_ids)),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_notifications(&self, notification_ids: &[i32]) -> RepositoryResult<usize> {
        use crate::schema::notifications;

        if notification_ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            notifications::table.filter(notifications::id.eq_any(notification_ids)),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }
}
