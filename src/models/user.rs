use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::User as DomainUser;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub primary_role: Option<String>,
    pub is_active: bool,
    pub professional_title: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub company_name: Option<String>,
    pub profile_embedding: Option<String>,
    pub embedding_updated_at: Option<NaiveDateTime>,
}

impl From<User> for DomainUser {
    fn from(user: User) -> Self {
        DomainUser {
            id: user.id,
            username: user.username,
            email: user.email,
            primary_role: user.primary_role,
            is_active: user.is_active,
            professional_title: user.professional_title,
            bio: user.bio,
            skills: user.skills,
            experience: user.experience,
            education: user.education,
            location: user.location,
            company_name: user.company_name,
            embedding: user.profile_embedding,
            embedding_updated_at: user.embedding_updated_at,
        }
    }
}
