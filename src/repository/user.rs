use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::User;
use crate::domain::user::TALENT_ROLES;
use crate::models::user::User as DbUser;
use crate::repository::{DieselRepository, RepositoryResult, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user(&self, user_id: i32) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let result = users::table
            .filter(users::id.eq(user_id))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)?;

        Ok(result.into())
    }

    fn list_users(&self) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let result = users::table
            .order(users::id.asc())
            .select(DbUser::as_select())
            .load::<DbUser>(&mut conn)?;

        Ok(result.into_iter().map(User::from).collect())
    }

    fn list_recommendation_recipients(&self) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let result = users::table
            .filter(users::is_active.eq(true))
            .filter(users::primary_role.eq_any(TALENT_ROLES))
            .filter(users::profile_embedding.is_not_null())
            .order(users::id.asc())
            .select(DbUser::as_select())
            .load::<DbUser>(&mut conn)?;

        Ok(result.into_iter().map(User::from).collect())
    }
}

impl UserWriter for DieselRepository {
    fn set_user_embedding(
        &self,
        user_id: i32,
        embedding: &str,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let affected = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set((
                users::profile_embedding.eq(embedding),
                users::embedding_updated_at.eq(updated_at),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
