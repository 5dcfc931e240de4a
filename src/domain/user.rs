use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Roles that receive job recommendations.
pub const TALENT_ROLES: [&str; 2] = ["talent", "freelancer"];

/// Matchable fields of a user profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub professional_title: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub primary_role: Option<String>,
    pub company_name: Option<String>,
}

/// A persisted user account with its profile fields.
#[derive(Clone, Debug, PartialEq)]
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
    pub embedding: Option<String>,
    pub embedding_updated_at: Option<NaiveDateTime>,
}

impl User {
    pub fn record(&self) -> ProfileRecord {
        ProfileRecord {
            professional_title: self.professional_title.clone(),
            bio: self.bio.clone(),
            skills: self.skills.clone(),
            experience: self.experience.clone(),
            education: self.education.clone(),
            location: self.location.clone(),
            primary_role: self.primary_role.clone(),
            company_name: self.company_name.clone(),
        }
    }

    pub fn is_talent(&self) -> bool {
        self.primary_role
            .as_deref()
            .is_some_and(|role| TALENT_ROLES.contains(&role))
    }
}
