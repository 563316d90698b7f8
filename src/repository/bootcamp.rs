//! Repository implementation for bootcamps.

use std::collections::HashMap;

use diesel::BoxableExpression;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel::sqlite::Sqlite;

use crate::db::DbConnection;
use crate::domain::bootcamp::{Bootcamp, NewBootcamp, UpdateBootcamp};
use crate::domain::course::Course;
use crate::geocode::{GeoBounds, GeoPoint, haversine_miles};
use crate::listing::{Comparison, Filter, SortField};
use crate::models::bootcamp::{
    Bootcamp as DbBootcamp, NewBootcamp as DbNewBootcamp, UpdateBootcamp as DbUpdateBootcamp,
};
use crate::models::course::Course as DbCourse;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::filters::{
    parse_bool, parse_datetime, parse_f64, parse_i32, parsed_filter, sort_by, text_filter,
    unknown_filter_field, unknown_sort_field,
};
use crate::repository::{BootcampListQuery, BootcampReader, BootcampWriter, DieselRepository};

type BoxedBootcampQuery<'a> = crate::schema::bootcamps::BoxedQuery<'a, Sqlite>;

/// Translate parsed filters into a boxed query over the bootcamps table.
fn filtered(filters: &[Filter]) -> RepositoryResult<BoxedBootcampQuery<'static>> {
    use crate::schema::bootcamps;

    let mut query = bootcamps::table.into_boxed();
    for filter in filters {
        query = match filter.field.as_str() {
            "name" => text_filter!(query, bootcamps::name, filter)?,
            "description" => text_filter!(query, bootcamps::description, filter)?,
            "website" => text_filter!(query, bootcamps::website, filter)?,
            "phone" => text_filter!(query, bootcamps::phone, filter)?,
            "email" => text_filter!(query, bootcamps::email, filter)?,
            "address" => text_filter!(query, bootcamps::address, filter)?,
            "photo" => text_filter!(query, bootcamps::photo, filter)?,
            "careers" => careers_filter(query, filter)?,
            "housing" => parsed_filter!(query, bootcamps::housing, filter, parse_bool)?,
            "jobAssistance" => {
                parsed_filter!(query, bootcamps::job_assistance, filter, parse_bool)?
            }
            "jobGuarantee" => parsed_filter!(query, bootcamps::job_guarantee, filter, parse_bool)?,
            "acceptGi" => parsed_filter!(query, bootcamps::accept_gi, filter, parse_bool)?,
            "averageCost" => parsed_filter!(query, bootcamps::average_cost, filter, parse_f64)?,
            "averageRating" => parsed_filter!(query, bootcamps::average_rating, filter, parse_f64)?,
            "id" => parsed_filter!(query, bootcamps::id, filter, parse_i32)?,
            "userId" => parsed_filter!(query, bootcamps::user_id, filter, parse_i32)?,
            "createdAt" => parsed_filter!(query, bootcamps::created_at, filter, parse_datetime)?,
            field => return Err(unknown_filter_field("bootcamps", field)),
        };
    }
    Ok(query)
}

/// Careers are stored as a JSON array in a text column, so membership
/// becomes a `LIKE` against the JSON-encoded element.
fn careers_filter<'a>(
    query: BoxedBootcampQuery<'a>,
    filter: &Filter,
) -> RepositoryResult<BoxedBootcampQuery<'a>> {
    use crate::schema::bootcamps;

    let values: Vec<&str> = match &filter.comparison {
        Comparison::Eq(value) => vec![value.as_str()],
        Comparison::In(values) => values.iter().map(String::as_str).collect(),
        _ => {
            return Err(RepositoryError::ValidationError(
                "careers supports only equality and `in` filters".into(),
            ));
        }
    };

    let mut condition: Option<Box<dyn BoxableExpression<bootcamps::table, Sqlite, SqlType = Bool>>> =
        None;
    for value in values {
        let encoded = serde_json::to_string(value).unwrap_or_default();
        let matches = bootcamps::careers.like(format!("%{encoded}%"));
        condition = Some(match condition {
            Some(previous) => Box::new(previous.or(matches)),
            None => Box::new(matches),
        });
    }

    match condition {
        Some(condition) => Ok(query.filter(condition)),
        // An empty `in` list can never match.
        None => Ok(query.filter(bootcamps::id.eq(-1))),
    }
}

fn sorted<'a>(
    mut query: BoxedBootcampQuery<'a>,
    sort: &[SortField],
) -> RepositoryResult<BoxedBootcampQuery<'a>> {
    use crate::schema::bootcamps;

    if sort.is_empty() {
        // Newest first, id as the tie breaker.
        return Ok(query.order((bootcamps::created_at.desc(), bootcamps::id.desc())));
    }

    let mut first = true;
    for key in sort {
        query = match key.field.as_str() {
            "name" => sort_by!(query, bootcamps::name, key, first),
            "description" => sort_by!(query, bootcamps::description, key, first),
            "address" => sort_by!(query, bootcamps::address, key, first),
            "housing" => sort_by!(query, bootcamps::housing, key, first),
            "jobAssistance" => sort_by!(query, bootcamps::job_assistance, key, first),
            "jobGuarantee" => sort_by!(query, bootcamps::job_guarantee, key, first),
            "acceptGi" => sort_by!(query, bootcamps::accept_gi, key, first),
            "averageCost" => sort_by!(query, bootcamps::average_cost, key, first),
            "averageRating" => sort_by!(query, bootcamps::average_rating, key, first),
            "id" => sort_by!(query, bootcamps::id, key, first),
            "userId" => sort_by!(query, bootcamps::user_id, key, first),
            "createdAt" => sort_by!(query, bootcamps::created_at, key, first),
            field => return Err(unknown_sort_field("bootcamps", field)),
        };
        first = false;
    }
    Ok(query)
}

/// Load the courses of every listed bootcamp in one query and attach them.
fn attach_courses(conn: &mut DbConnection, bootcamps: &mut [Bootcamp]) -> RepositoryResult<()> {
    use crate::schema::courses;

    let ids: Vec<i32> = bootcamps.iter().map(|b| b.id).collect();
    let rows = courses::table
        .filter(courses::bootcamp_id.eq_any(ids))
        .order(courses::id.asc())
        .load::<DbCourse>(conn)?;

    let mut by_bootcamp: HashMap<i32, Vec<Course>> = HashMap::new();
    for row in rows {
        by_bootcamp
            .entry(row.bootcamp_id)
            .or_default()
            .push(row.into());
    }

    for bootcamp in bootcamps {
        bootcamp.courses = Some(by_bootcamp.remove(&bootcamp.id).unwrap_or_default());
    }
    Ok(())
}

impl BootcampReader for DieselRepository {
    fn get_bootcamp_by_id(&self, id: i32) -> RepositoryResult<Option<Bootcamp>> {
        use crate::schema::bootcamps;

        let mut conn = self.conn()?;
        let bootcamp = bootcamps::table
            .find(id)
            .first::<DbBootcamp>(&mut conn)
            .optional()?;

        Ok(bootcamp.map(Into::into))
    }

    fn get_bootcamp_by_user(&self, user_id: i32) -> RepositoryResult<Option<Bootcamp>> {
        use crate::schema::bootcamps;

        let mut conn = self.conn()?;
        let bootcamp = bootcamps::table
            .filter(bootcamps::user_id.eq(user_id))
            .first::<DbBootcamp>(&mut conn)
            .optional()?;

        Ok(bootcamp.map(Into::into))
    }

    fn list_bootcamps(&self, query: BootcampListQuery) -> RepositoryResult<(usize, Vec<Bootcamp>)> {
        let mut conn = self.conn()?;
        let params = &query.params;

        // Count first, over the same filters but free of sort and paging.
        let total: i64 = filtered(&params.filters)?
            .count()
            .get_result(&mut conn)?;

        let rows = sorted(filtered(&params.filters)?, &params.sort)?
            .offset(params.offset())
            .limit(params.limit())
            .load::<DbBootcamp>(&mut conn)?;

        let mut bootcamps: Vec<Bootcamp> = rows.into_iter().map(Into::into).collect();

        if query.with_courses {
            attach_courses(&mut conn, &mut bootcamps)?;
        }

        Ok((total as usize, bootcamps))
    }

    fn list_bootcamps_within(
        &self,
        center: GeoPoint,
        radius_miles: f64,
    ) -> RepositoryResult<Vec<Bootcamp>> {
        use crate::schema::bootcamps;

        let mut conn = self.conn()?;
        let bounds = GeoBounds::around(center, radius_miles);

        // Bounding box in SQL, exact distance in memory.
        let candidates = bootcamps::table
            .filter(
                bootcamps::latitude.between(Some(bounds.min_latitude), Some(bounds.max_latitude)),
            )
            .filter(
                bootcamps::longitude
                    .between(Some(bounds.min_longitude), Some(bounds.max_longitude)),
            )
            .order(bootcamps::id.asc())
            .load::<DbBootcamp>(&mut conn)?;

        let within = candidates
            .into_iter()
            .map(Bootcamp::from)
            .filter(|bootcamp| match (bootcamp.latitude, bootcamp.longitude) {
                (Some(latitude), Some(longitude)) => {
                    let location = GeoPoint {
                        latitude,
                        longitude,
                    };
                    haversine_miles(center, location) <= radius_miles
                }
                _ => false,
            })
            .collect();

        Ok(within)
    }
}

impl BootcampWriter for DieselRepository {
    fn create_bootcamp(&self, new_bootcamp: &NewBootcamp) -> RepositoryResult<Bootcamp> {
        use crate::schema::bootcamps;

        let mut conn = self.conn()?;
        let db_bootcamp = diesel::insert_into(bootcamps::table)
            .values(DbNewBootcamp::from(new_bootcamp))
            .get_result::<DbBootcamp>(&mut conn)?;

        Ok(db_bootcamp.into())
    }

    fn update_bootcamp(
        &self,
        bootcamp_id: i32,
        updates: &UpdateBootcamp,
    ) -> RepositoryResult<Bootcamp> {
        use crate::schema::bootcamps;

        let mut conn = self.conn()?;

        if updates.is_empty() {
            let current = bootcamps::table
                .find(bootcamp_id)
                .first::<DbBootcamp>(&mut conn)?;
            return Ok(current.into());
        }

        let db_updates = DbUpdateBootcamp::from(updates);
        let updated = diesel::update(bootcamps::table.find(bootcamp_id))
            .set(&db_updates)
            .get_result::<DbBootcamp>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_bootcamp(&self, bootcamp_id: i32) -> RepositoryResult<()> {
        use crate::schema::{bootcamps, courses, reviews};

        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(reviews::table.filter(reviews::bootcamp_id.eq(bootcamp_id)))
                .execute(conn)?;
            diesel::delete(courses::table.filter(courses::bootcamp_id.eq(bootcamp_id)))
                .execute(conn)?;
            diesel::delete(bootcamps::table.find(bootcamp_id)).execute(conn)?;
            Ok(())
        })
    }

    fn set_bootcamp_photo(&self, bootcamp_id: i32, file_name: &str) -> RepositoryResult<Bootcamp> {
        use crate::schema::bootcamps;

        let mut conn = self.conn()?;
        let updated = diesel::update(bootcamps::table.find(bootcamp_id))
            .set(bootcamps::photo.eq(file_name))
            .get_result::<DbBootcamp>(&mut conn)?;

        Ok(updated.into())
    }
}
