//! Repository implementation for reviews.
//!
//! Writers keep the reviewed bootcamp's `average_rating` up to date inside
//! the same transaction as the write. A unique index over
//! `(bootcamp_id, user_id)` enforces one review per user and bootcamp; a
//! second insert surfaces as a constraint violation.

use std::collections::HashMap;

use diesel::dsl::avg;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::DbConnection;
use crate::domain::bootcamp::BootcampSummary;
use crate::domain::review::{NewReview, Review, UpdateReview};
use crate::listing::{Filter, SortField};
use crate::models::review::{
    NewReview as DbNewReview, Review as DbReview, UpdateReview as DbUpdateReview,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::filters::{
    parse_datetime, parse_f64, parse_i32, parsed_filter, sort_by, text_filter,
    unknown_filter_field, unknown_sort_field,
};
use crate::repository::{DieselRepository, ReviewListQuery, ReviewReader, ReviewWriter};

type BoxedReviewQuery<'a> = crate::schema::reviews::BoxedQuery<'a, Sqlite>;

fn filtered(filters: &[Filter]) -> RepositoryResult<BoxedReviewQuery<'static>> {
    use crate::schema::reviews;

    let mut query = reviews::table.into_boxed();
    for filter in filters {
        query = match filter.field.as_str() {
            "title" => text_filter!(query, reviews::title, filter)?,
            "text" => text_filter!(query, reviews::text, filter)?,
            "rating" => parsed_filter!(query, reviews::rating, filter, parse_f64)?,
            "id" => parsed_filter!(query, reviews::id, filter, parse_i32)?,
            "bootcampId" => parsed_filter!(query, reviews::bootcamp_id, filter, parse_i32)?,
            "userId" => parsed_filter!(query, reviews::user_id, filter, parse_i32)?,
            "createdAt" => parsed_filter!(query, reviews::created_at, filter, parse_datetime)?,
            field => return Err(unknown_filter_field("reviews", field)),
        };
    }
    Ok(query)
}

fn sorted<'a>(
    mut query: BoxedReviewQuery<'a>,
    sort: &[SortField],
) -> RepositoryResult<BoxedReviewQuery<'a>> {
    use crate::schema::reviews;

    if sort.is_empty() {
        return Ok(query.order((reviews::created_at.desc(), reviews::id.desc())));
    }

    let mut first = true;
    for key in sort {
        query = match key.field.as_str() {
            "title" => sort_by!(query, reviews::title, key, first),
            "rating" => sort_by!(query, reviews::rating, key, first),
            "id" => sort_by!(query, reviews::id, key, first),
            "bootcampId" => sort_by!(query, reviews::bootcamp_id, key, first),
            "userId" => sort_by!(query, reviews::user_id, key, first),
            "createdAt" => sort_by!(query, reviews::created_at, key, first),
            field => return Err(unknown_sort_field("reviews", field)),
        };
        first = false;
    }
    Ok(query)
}

fn attach_bootcamp_summaries(
    conn: &mut DbConnection,
    reviews: &mut [Review],
) -> RepositoryResult<()> {
    use crate::schema::bootcamps;

    let ids: Vec<i32> = reviews.iter().map(|r| r.bootcamp_id).collect();
    let summaries: HashMap<i32, BootcampSummary> = bootcamps::table
        .filter(bootcamps::id.eq_any(ids))
        .select((bootcamps::id, bootcamps::name, bootcamps::description))
        .load::<(i32, String, String)>(conn)?
        .into_iter()
        .map(|(id, name, description)| {
            (
                id,
                BootcampSummary {
                    id,
                    name,
                    description,
                },
            )
        })
        .collect();

    for review in reviews {
        review.bootcamp = summaries.get(&review.bootcamp_id).cloned();
    }
    Ok(())
}

/// Recompute the bootcamp's average rating from its current reviews.
fn refresh_average_rating(conn: &mut DbConnection, bootcamp_id: i32) -> RepositoryResult<()> {
    use crate::schema::{bootcamps, reviews};

    let average: Option<f64> = reviews::table
        .filter(reviews::bootcamp_id.eq(bootcamp_id))
        .select(avg(reviews::rating))
        .get_result(conn)?;

    diesel::update(bootcamps::table.find(bootcamp_id))
        .set(bootcamps::average_rating.eq(average))
        .execute(conn)?;
    Ok(())
}

impl ReviewReader for DieselRepository {
    fn get_review_by_id(&self, id: i32) -> RepositoryResult<Option<Review>> {
        use crate::schema::{bootcamps, reviews};

        let mut conn = self.conn()?;
        let row = reviews::table
            .inner_join(bootcamps::table)
            .filter(reviews::id.eq(id))
            .select((
                reviews::all_columns,
                (bootcamps::id, bootcamps::name, bootcamps::description),
            ))
            .first::<(DbReview, (i32, String, String))>(&mut conn)
            .optional()?;

        Ok(row.map(|(db_review, (bootcamp_id, name, description))| {
            let mut review: Review = db_review.into();
            review.bootcamp = Some(BootcampSummary {
                id: bootcamp_id,
                name,
                description,
            });
            review
        }))
    }

    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<(usize, Vec<Review>)> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let params = &query.params;

        let build = || -> RepositoryResult<BoxedReviewQuery<'static>> {
            let mut built = filtered(&params.filters)?;
            if let Some(bootcamp_id) = query.bootcamp_id {
                built = built.filter(reviews::bootcamp_id.eq(bootcamp_id));
            }
            Ok(built)
        };

        let total: i64 = build()?.count().get_result(&mut conn)?;

        let rows = sorted(build()?, &params.sort)?
            .offset(params.offset())
            .limit(params.limit())
            .load::<DbReview>(&mut conn)?;

        let mut reviews: Vec<Review> = rows.into_iter().map(Into::into).collect();

        if query.with_bootcamp {
            attach_bootcamp_summaries(&mut conn, &mut reviews)?;
        }

        Ok((total as usize, reviews))
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let db_review = conn.transaction::<_, RepositoryError, _>(|conn| {
            let review = diesel::insert_into(reviews::table)
                .values(DbNewReview::from(new_review))
                .get_result::<DbReview>(conn)?;
            refresh_average_rating(conn, review.bootcamp_id)?;
            Ok(review)
        })?;

        Ok(db_review.into())
    }

    fn update_review(&self, review_id: i32, updates: &UpdateReview) -> RepositoryResult<Review> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        if updates.is_empty() {
            let current = reviews::table.find(review_id).first::<DbReview>(&mut conn)?;
            return Ok(current.into());
        }

        let db_updates = DbUpdateReview::from(updates);
        let db_review = conn.transaction::<_, RepositoryError, _>(|conn| {
            let review = diesel::update(reviews::table.find(review_id))
                .set(&db_updates)
                .get_result::<DbReview>(conn)?;
            refresh_average_rating(conn, review.bootcamp_id)?;
            Ok(review)
        })?;

        Ok(db_review.into())
    }

    fn delete_review(&self, review_id: i32) -> RepositoryResult<()> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let review = reviews::table.find(review_id).first::<DbReview>(conn)?;
            diesel::delete(reviews::table.find(review_id)).execute(conn)?;
            refresh_average_rating(conn, review.bootcamp_id)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListParams;

    #[test]
    fn unknown_filter_field_is_rejected() {
        let params = ListParams::from_pairs(vec![("stars".to_string(), "5".to_string())]);
        assert!(matches!(
            filtered(&params.filters),
            Err(RepositoryError::ValidationError(_))
        ));
    }

    #[test]
    fn rating_range_filter_builds() {
        let params = ListParams::from_pairs(vec![("rating[gte]".to_string(), "8".to_string())]);
        assert!(filtered(&params.filters).is_ok());
    }
}
