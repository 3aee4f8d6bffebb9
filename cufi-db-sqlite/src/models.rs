#![allow(clippy::extra_unused_lifetimes)]

// NOTE:
// Dates are stored as ISO 8601 text (YYYY-MM-DD) so that
// their lexicographical order is chronological.

use super::schema::*;

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = events)]
pub struct NewEvent<'a> {
    pub start_date: String,
    pub end_date: String,
    pub denomination: &'a str,
    pub description: &'a str,
    pub price: &'a str,
    pub schedule: &'a str,
    pub subtitle: &'a str,
    pub ambit: &'a str,
    pub category: &'a str,
    pub other_categories: &'a str,
    pub link: &'a str,
    pub images: &'a str,
    pub address: &'a str,
    pub region: &'a str,
    pub email: &'a str,
    pub space: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: &'a str,
    pub app_image: &'a str,
}

#[derive(Queryable)]
pub struct EventEntity {
    pub id: i64,
    pub start_date: String,
    pub end_date: String,
    pub denomination: String,
    pub description: String,
    pub price: String,
    pub schedule: String,
    pub subtitle: String,
    pub ambit: String,
    pub category: String,
    pub other_categories: String,
    pub link: String,
    pub images: String,
    pub address: String,
    pub region: String,
    pub email: String,
    pub space: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: String,
    pub app_image: String,
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = event_ratings)]
pub struct EventRating {
    pub event_id: i64,
    pub user_id: String,
    pub score: f64,
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = assistances)]
pub struct Assistance {
    pub user_id: String,
    pub event_id: i64,
}

#[derive(Queryable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: String,
    pub name: String,
    pub birth_date: String,
    pub profile_image: String,
    pub preferred_categories: String,
    pub is_admin: bool,
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = sessions)]
pub struct SessionEntity {
    pub user_id: String,
    pub token: String,
    pub device_token: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = saved_lists)]
pub struct NewSavedList<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub description: &'a str,
}

#[derive(Queryable)]
pub struct SavedListEntity {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub description: String,
}

#[derive(Insertable)]
#[diesel(table_name = saved_list_events)]
pub struct NewSavedListEvent {
    pub list_id: i64,
    pub event_id: i64,
}

#[derive(Insertable)]
#[diesel(table_name = incidents)]
pub struct NewIncident<'a> {
    pub user_id: &'a str,
    pub event_id: i64,
    pub description: &'a str,
}

#[derive(Queryable)]
pub struct IncidentEntity {
    pub id: i64,
    pub user_id: String,
    pub event_id: i64,
    pub description: String,
    pub response: Option<String>,
    pub resolved: bool,
}
