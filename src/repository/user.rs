//! Repository implementation for user accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::user::{NewUser, UpdateUser, User};
use crate::listing::{Filter, SortField};
use crate::models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::filters::{
    parse_datetime, parse_i32, parsed_filter, sort_by, text_filter, unknown_filter_field,
    unknown_sort_field,
};
use crate::repository::{DieselRepository, UserListQuery, UserReader, UserWriter};

type BoxedUserQuery<'a> = crate::schema::users::BoxedQuery<'a, Sqlite>;

fn filtered(filters: &[Filter]) -> RepositoryResult<BoxedUserQuery<'static>> {
    use crate::schema::users;

    let mut query = users::table.into_boxed();
    for filter in filters {
        query = match filter.field.as_str() {
            "name" => text_filter!(query, users::name, filter)?,
            "email" => text_filter!(query, users::email, filter)?,
            "role" => text_filter!(query, users::role, filter)?,
            "id" => parsed_filter!(query, users::id, filter, parse_i32)?,
            "createdAt" => parsed_filter!(query, users::created_at, filter, parse_datetime)?,
            field => return Err(unknown_filter_field("users", field)),
        };
    }
    Ok(query)
}

fn sorted<'a>(
    mut query: BoxedUserQuery<'a>,
    sort: &[SortField],
) -> RepositoryResult<BoxedUserQuery<'a>> {
    use crate::schema::users;

    if sort.is_empty() {
        return Ok(query.order((users::created_at.desc(), users::id.desc())));
    }

    let mut first = true;
    for key in sort {
        query = match key.field.as_str() {
            "name" => sort_by!(query, users::name, key, first),
            "email" => sort_by!(query, users::email, key, first),
            "role" => sort_by!(query, users::role, key, first),
            "id" => sort_by!(query, users::id, key, first),
            "createdAt" => sort_by!(query, users::created_at, key, first),
            field => return Err(unknown_sort_field("users", field)),
        };
        first = false;
    }
    Ok(query)
}

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table.find(id).first::<DbUser>(&mut conn).optional()?;

        Ok(user.map(Into::into))
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_user_by_reset_token(
        &self,
        token_hash: &str,
        now: NaiveDateTime,
    ) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::reset_password_token.eq(token_hash))
            .filter(users::reset_password_expire.gt(now))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        let mut conn = self.conn()?;
        let params = &query.params;

        let total: i64 = filtered(&params.filters)?
            .count()
            .get_result(&mut conn)?;

        let rows = sorted(filtered(&params.filters)?, &params.sort)?
            .offset(params.offset())
            .limit(params.limit())
            .load::<DbUser>(&mut conn)?;

        Ok((total as usize, rows.into_iter().map(Into::into).collect()))
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = diesel::insert_into(users::table)
            .values(DbNewUser::from(new_user))
            .get_result::<DbUser>(&mut conn)?;

        Ok(db_user.into())
    }

    fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        if updates.is_empty() {
            let current = users::table.find(user_id).first::<DbUser>(&mut conn)?;
            return Ok(current.into());
        }

        let db_updates = DbUpdateUser::from(updates);
        let updated = diesel::update(users::table.find(user_id))
            .set(&db_updates)
            .get_result::<DbUser>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_user_password(&self, user_id: i32, password_hash: &str) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let updated = diesel::update(users::table.find(user_id))
            .set((
                users::password_hash.eq(password_hash),
                users::reset_password_token.eq(None::<String>),
                users::reset_password_expire.eq(None::<NaiveDateTime>),
            ))
            .get_result::<DbUser>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_reset_token(
        &self,
        user_id: i32,
        token_hash: &str,
        expires: NaiveDateTime,
    ) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let affected = diesel::update(users::table.find(user_id))
            .set((
                users::reset_password_token.eq(token_hash),
                users::reset_password_expire.eq(expires),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn clear_reset_token(&self, user_id: i32) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        diesel::update(users::table.find(user_id))
            .set((
                users::reset_password_token.eq(None::<String>),
                users::reset_password_expire.eq(None::<NaiveDateTime>),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    fn delete_user(&self, user_id: i32) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let affected = diesel::delete(users::table.find(user_id)).execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
