use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::notification::{
    NewNotification as DomainNewNotification, Notification as DomainNotification,
};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
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

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewNotification {
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub data: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<Notification> for DomainNotification {
    fn from(notification: Notification) -> Self {
        DomainNotification {
            id: notification.id,
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            is_read: notification.is_read,
            data: notification.data,
            created_at: notification.created_at,
        }
    }
}

impl From<DomainNewNotification> for NewNotification {
    fn from(notification: DomainNewNotification) -> Self {
        NewNotification {
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            is_read: false,
            data: notification.data,
            created_at: notification.created_at,
        }
    }
}
