use super::*;

impl AssistanceRepo for DbReadOnly<'_> {
    fn create_assistance(&self, _assistance: &Assistance) -> Result<()> {
        Err(read_only_access())
    }
    fn delete_assistance(&self, _user_id: &UserId, _event_id: EventId) -> Result<()> {
        Err(read_only_access())
    }
    fn exists_assistance(&self, user_id: &UserId, event_id: EventId) -> Result<bool> {
        exists_assistance(&mut self.conn.borrow_mut(), user_id, event_id)
    }

    fn all_assistances(&self, pagination: &Pagination) -> Result<Vec<Assistance>> {
        all_assistances(&mut self.conn.borrow_mut(), pagination)
    }
    fn event_ids_attended_by(&self, user_id: &UserId) -> Result<Vec<EventId>> {
        event_ids_attended_by(&mut self.conn.borrow_mut(), user_id)
    }
    fn count_assistants(&self, event_id: EventId) -> Result<u64> {
        count_assistants(&mut self.conn.borrow_mut(), event_id)
    }
    fn most_attended_event_ids(&self, pagination: &Pagination) -> Result<Vec<(EventId, u64)>> {
        most_attended_event_ids(&mut self.conn.borrow_mut(), pagination)
    }

    fn delete_assistances_of_user(&self, _user_id: &UserId) -> Result<usize> {
        Err(read_only_access())
    }
    fn delete_assistances_of_event(&self, _event_id: EventId) -> Result<usize> {
        Err(read_only_access())
    }
}

macro_rules! impl_assistance_repo {
    ($db:ident) => {
        impl AssistanceRepo for $db<'_> {
            fn create_assistance(&self, assistance: &Assistance) -> Result<()> {
                create_assistance(&mut self.conn.borrow_mut(), assistance)
            }
            fn delete_assistance(&self, user_id: &UserId, event_id: EventId) -> Result<()> {
                delete_assistance(&mut self.conn.borrow_mut(), user_id, event_id)
            }
            fn exists_assistance(&self, user_id: &UserId, event_id: EventId) -> Result<bool> {
                exists_assistance(&mut self.conn.borrow_mut(), user_id, event_id)
            }

            fn all_assistances(&self, pagination: &Pagination) -> Result<Vec<Assistance>> {
                all_assistances(&mut self.conn.borrow_mut(), pagination)
            }
            fn event_ids_attended_by(&self, user_id: &UserId) -> Result<Vec<EventId>> {
                event_ids_attended_by(&mut self.conn.borrow_mut(), user_id)
            }
            fn count_assistants(&self, event_id: EventId) -> Result<u64> {
                count_assistants(&mut self.conn.borrow_mut(), event_id)
            }
            fn most_attended_event_ids(
                &self,
                pagination: &Pagination,
            ) -> Result<Vec<(EventId, u64)>> {
                most_attended_event_ids(&mut self.conn.borrow_mut(), pagination)
            }

            fn delete_assistances_of_user(&self, user_id: &UserId) -> Result<usize> {
                delete_assistances_of_user(&mut self.conn.borrow_mut(), user_id)
            }
            fn delete_assistances_of_event(&self, event_id: EventId) -> Result<usize> {
                delete_assistances_of_event(&mut self.conn.borrow_mut(), event_id)
            }
        }
    };
}

impl_assistance_repo!(DbReadWrite);
impl_assistance_repo!(DbConnection);

fn create_assistance(conn: &mut SqliteConnection, assistance: &Assistance) -> Result<()> {
    let new_assistance = models::Assistance {
        user_id: assistance.user_id.to_string(),
        event_id: assistance.event_id.to_inner(),
    };
    diesel::insert_into(schema::assistances::table)
        .values(&new_assistance)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn delete_assistance(conn: &mut SqliteConnection, user_id: &UserId, event_id: EventId) -> Result<()> {
    use schema::assistances::dsl;
    let count = diesel::delete(
        dsl::assistances
            .filter(dsl::user_id.eq(user_id.as_str()))
            .filter(dsl::event_id.eq(event_id.to_inner())),
    )
    .execute(conn)
    .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn exists_assistance(conn: &mut SqliteConnection, user_id: &UserId, event_id: EventId) -> Result<bool> {
    use schema::assistances::dsl;
    diesel::select(diesel::dsl::exists(
        dsl::assistances
            .filter(dsl::user_id.eq(user_id.as_str()))
            .filter(dsl::event_id.eq(event_id.to_inner())),
    ))
    .get_result(conn)
    .map_err(from_diesel_err)
}

fn all_assistances(conn: &mut SqliteConnection, pagination: &Pagination) -> Result<Vec<Assistance>> {
    use schema::assistances::dsl;
    // Insertion order
    let mut query = dsl::assistances
        .select((dsl::user_id, dsl::event_id))
        .order_by(diesel::dsl::sql::<diesel::sql_types::BigInt>("rowid"))
        .into_boxed();
    paginate!(query, pagination);
    Ok(query
        .load::<models::Assistance>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(|models::Assistance { user_id, event_id }| Assistance {
            user_id: user_id.into(),
            event_id: event_id.into(),
        })
        .collect())
}

fn event_ids_attended_by(conn: &mut SqliteConnection, user_id: &UserId) -> Result<Vec<EventId>> {
    use schema::assistances::dsl;
    Ok(dsl::assistances
        .select(dsl::event_id)
        .filter(dsl::user_id.eq(user_id.as_str()))
        .order_by(diesel::dsl::sql::<diesel::sql_types::BigInt>("rowid"))
        .load::<i64>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn count_assistants(conn: &mut SqliteConnection, event_id: EventId) -> Result<u64> {
    use schema::assistances::dsl;
    Ok(dsl::assistances
        .filter(dsl::event_id.eq(event_id.to_inner()))
        .count()
        .get_result::<i64>(conn)
        .map_err(from_diesel_err)? as u64)
}

fn most_attended_event_ids(
    conn: &mut SqliteConnection,
    pagination: &Pagination,
) -> Result<Vec<(EventId, u64)>> {
    use diesel::dsl::count_star;
    use schema::assistances::dsl;
    let mut query = dsl::assistances
        .group_by(dsl::event_id)
        .select((dsl::event_id, count_star()))
        .order_by((count_star().desc(), dsl::event_id))
        .into_boxed();
    paginate!(query, pagination);
    Ok(query
        .load::<(i64, i64)>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(|(event_id, count)| (event_id.into(), count as u64))
        .collect())
}

fn delete_assistances_of_user(conn: &mut SqliteConnection, user_id: &UserId) -> Result<usize> {
    use schema::assistances::dsl;
    diesel::delete(dsl::assistances.filter(dsl::user_id.eq(user_id.as_str())))
        .execute(conn)
        .map_err(from_diesel_err)
}

fn delete_assistances_of_event(conn: &mut SqliteConnection, event_id: EventId) -> Result<usize> {
    use schema::assistances::dsl;
    diesel::delete(dsl::assistances.filter(dsl::event_id.eq(event_id.to_inner())))
        .execute(conn)
        .map_err(from_diesel_err)
}
