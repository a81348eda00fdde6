//! Diesel ORM models for the movies table.

use diesel::prelude::*;

use crate::models::MovieRecord;
use crate::schema;

use super::parse_datetime;

/// Movie record as stored in the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::movies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MovieRow {
    pub id: i32,
    pub name: String,
    pub genre: String,
    pub rating: i32,
    pub votes: i64,
    pub duration: i32,
    pub scraped_at: String,
}

/// New movie for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::movies)]
pub struct NewMovie<'a> {
    pub name: &'a str,
    pub genre: &'a str,
    pub rating: i32,
    pub votes: i64,
    pub duration: i32,
    pub scraped_at: &'a str,
}

impl From<MovieRow> for MovieRecord {
    fn from(row: MovieRow) -> Self {
        // Re-assert the non-negativity invariant on the way out of storage;
        // a hand-edited database must not smuggle negatives into the domain.
        MovieRecord {
            name: row.name,
            genre: row.genre,
            rating: row.rating.clamp(0, 10) as u8,
            votes: row.votes.max(0) as u64,
            duration: row.duration.max(0) as u32,
            scraped_at: parse_datetime(&row.scraped_at),
        }
    }
}

impl<'a> NewMovie<'a> {
    /// Build an insertable row from a domain record and its timestamp text.
    pub fn from_record(record: &'a MovieRecord, scraped_at: &'a str) -> Self {
        Self {
            name: &record.name,
            genre: &record.genre,
            rating: record.rating as i32,
            votes: record.votes as i64,
            duration: record.duration as i32,
            scraped_at,
        }
    }
}
