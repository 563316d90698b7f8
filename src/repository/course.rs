//! Repository implementation for courses.
//!
//! Writers keep the owning bootcamp's `average_cost` up to date: the value
//! is the mean tuition of its courses rounded up to the nearest ten, or
//! null once no courses remain. Recomputation happens inside the same
//! transaction as the write.

use std::collections::HashMap;

use diesel::dsl::avg;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::DbConnection;
use crate::domain::bootcamp::BootcampSummary;
use crate::domain::course::{Course, NewCourse, UpdateCourse};
use crate::listing::{Filter, SortField};
use crate::models::course::{
    Course as DbCourse, NewCourse as DbNewCourse, UpdateCourse as DbUpdateCourse,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::filters::{
    parse_bool, parse_datetime, parse_f64, parse_i32, parsed_filter, sort_by, text_filter,
    unknown_filter_field, unknown_sort_field,
};
use crate::repository::{CourseListQuery, CourseReader, CourseWriter, DieselRepository};

type BoxedCourseQuery<'a> = crate::schema::courses::BoxedQuery<'a, Sqlite>;

fn filtered(filters: &[Filter]) -> RepositoryResult<BoxedCourseQuery<'static>> {
    use crate::schema::courses;

    let mut query = courses::table.into_boxed();
    for filter in filters {
        query = match filter.field.as_str() {
            "title" => text_filter!(query, courses::title, filter)?,
            "description" => text_filter!(query, courses::description, filter)?,
            "weeks" => text_filter!(query, courses::weeks, filter)?,
            "minimumSkill" => text_filter!(query, courses::minimum_skill, filter)?,
            "tuition" => parsed_filter!(query, courses::tuition, filter, parse_f64)?,
            "scholarshipAvailable" => {
                parsed_filter!(query, courses::scholarship_available, filter, parse_bool)?
            }
            "id" => parsed_filter!(query, courses::id, filter, parse_i32)?,
            "bootcampId" => parsed_filter!(query, courses::bootcamp_id, filter, parse_i32)?,
            "userId" => parsed_filter!(query, courses::user_id, filter, parse_i32)?,
            "createdAt" => parsed_filter!(query, courses::created_at, filter, parse_datetime)?,
            field => return Err(unknown_filter_field("courses", field)),
        };
    }
    Ok(query)
}

fn sorted<'a>(
    mut query: BoxedCourseQuery<'a>,
    sort: &[SortField],
) -> RepositoryResult<BoxedCourseQuery<'a>> {
    use crate::schema::courses;

    if sort.is_empty() {
        return Ok(query.order((courses::created_at.desc(), courses::id.desc())));
    }

    let mut first = true;
    for key in sort {
        query = match key.field.as_str() {
            "title" => sort_by!(query, courses::title, key, first),
            "description" => sort_by!(query, courses::description, key, first),
            "weeks" => sort_by!(query, courses::weeks, key, first),
            "minimumSkill" => sort_by!(query, courses::minimum_skill, key, first),
            "tuition" => sort_by!(query, courses::tuition, key, first),
            "scholarshipAvailable" => {
                sort_by!(query, courses::scholarship_available, key, first)
            }
            "id" => sort_by!(query, courses::id, key, first),
            "bootcampId" => sort_by!(query, courses::bootcamp_id, key, first),
            "userId" => sort_by!(query, courses::user_id, key, first),
            "createdAt" => sort_by!(query, courses::created_at, key, first),
            field => return Err(unknown_sort_field("courses", field)),
        };
        first = false;
    }
    Ok(query)
}

fn attach_bootcamp_summaries(
    conn: &mut DbConnection,
    courses: &mut [Course],
) -> RepositoryResult<()> {
    use crate::schema::bootcamps;

    let ids: Vec<i32> = courses.iter().map(|c| c.bootcamp_id).collect();
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

    for course in courses {
        course.bootcamp = summaries.get(&course.bootcamp_id).cloned();
    }
    Ok(())
}

/// Recompute the bootcamp's average cost from its current courses.
fn refresh_average_cost(conn: &mut DbConnection, bootcamp_id: i32) -> RepositoryResult<()> {
    use crate::schema::{bootcamps, courses};

    let average: Option<f64> = courses::table
        .filter(courses::bootcamp_id.eq(bootcamp_id))
        .select(avg(courses::tuition))
        .get_result(conn)?;
    let rounded = average.map(|value| (value / 10.0).ceil() * 10.0);

    diesel::update(bootcamps::table.find(bootcamp_id))
        .set(bootcamps::average_cost.eq(rounded))
        .execute(conn)?;
    Ok(())
}

impl CourseReader for DieselRepository {
    fn get_course_by_id(&self, id: i32) -> RepositoryResult<Option<Course>> {
        use crate::schema::{bootcamps, courses};

        let mut conn = self.conn()?;
        let row = courses::table
            .inner_join(bootcamps::table)
            .filter(courses::id.eq(id))
            .select((
                courses::all_columns,
                (bootcamps::id, bootcamps::name, bootcamps::description),
            ))
            .first::<(DbCourse, (i32, String, String))>(&mut conn)
            .optional()?;

        Ok(row.map(|(db_course, (bootcamp_id, name, description))| {
            let mut course: Course = db_course.into();
            course.bootcamp = Some(BootcampSummary {
                id: bootcamp_id,
                name,
                description,
            });
            course
        }))
    }

    fn list_courses(&self, query: CourseListQuery) -> RepositoryResult<(usize, Vec<Course>)> {
        use crate::schema::courses;

        let mut conn = self.conn()?;
        let params = &query.params;

        let build = || -> RepositoryResult<BoxedCourseQuery<'static>> {
            let mut built = filtered(&params.filters)?;
            if let Some(bootcamp_id) = query.bootcamp_id {
                built = built.filter(courses::bootcamp_id.eq(bootcamp_id));
            }
            Ok(built)
        };

        let total: i64 = build()?.count().get_result(&mut conn)?;

        let rows = sorted(build()?, &params.sort)?
            .offset(params.offset())
            .limit(params.limit())
            .load::<DbCourse>(&mut conn)?;

        let mut courses: Vec<Course> = rows.into_iter().map(Into::into).collect();

        if query.with_bootcamp {
            attach_bootcamp_summaries(&mut conn, &mut courses)?;
        }

        Ok((total as usize, courses))
    }
}

impl CourseWriter for DieselRepository {
    fn create_course(&self, new_course: &NewCourse) -> RepositoryResult<Course> {
        use crate::schema::courses;

        let mut conn = self.conn()?;
        let db_course = conn.transaction::<_, RepositoryError, _>(|conn| {
            let course = diesel::insert_into(courses::table)
                .values(DbNewCourse::from(new_course))
                .get_result::<DbCourse>(conn)?;
            refresh_average_cost(conn, course.bootcamp_id)?;
            Ok(course)
        })?;

        Ok(db_course.into())
    }

    fn update_course(&self, course_id: i32, updates: &UpdateCourse) -> RepositoryResult<Course> {
        use crate::schema::courses;

        let mut conn = self.conn()?;

        if updates.is_empty() {
            let current = courses::table.find(course_id).first::<DbCourse>(&mut conn)?;
            return Ok(current.into());
        }

        let db_updates = DbUpdateCourse::from(updates);
        let db_course = conn.transaction::<_, RepositoryError, _>(|conn| {
            let course = diesel::update(courses::table.find(course_id))
                .set(&db_updates)
                .get_result::<DbCourse>(conn)?;
            refresh_average_cost(conn, course.bootcamp_id)?;
            Ok(course)
        })?;

        Ok(db_course.into())
    }

    fn delete_course(&self, course_id: i32) -> RepositoryResult<()> {
        use crate::schema::courses;

        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let course = courses::table.find(course_id).first::<DbCourse>(conn)?;
            diesel::delete(courses::table.find(course_id)).execute(conn)?;
            refresh_average_cost(conn, course.bootcamp_id)?;
            Ok(())
        })
    }
}
