use std::collections::BTreeSet;

use super::*;

impl SavedListRepo for DbReadOnly<'_> {
    fn create_list(&self, _list: &NewSavedList) -> Result<ListId> {
        Err(read_only_access())
    }
    fn update_list(&self, _list: &SavedList) -> Result<()> {
        Err(read_only_access())
    }
    fn delete_list(&self, _id: ListId) -> Result<()> {
        Err(read_only_access())
    }

    fn get_list(&self, id: ListId) -> Result<SavedList> {
        get_list(&mut self.conn.borrow_mut(), id)
    }
    fn lists_of_user(&self, user_id: &UserId, pagination: &Pagination) -> Result<Vec<SavedList>> {
        lists_of_user(&mut self.conn.borrow_mut(), user_id, pagination)
    }

    fn add_event_to_list(&self, _id: ListId, _event_id: EventId) -> Result<()> {
        Err(read_only_access())
    }
    fn remove_event_from_list(&self, _id: ListId, _event_id: EventId) -> Result<()> {
        Err(read_only_access())
    }
    fn remove_event_from_all_lists(&self, _event_id: EventId) -> Result<usize> {
        Err(read_only_access())
    }

    fn delete_lists_of_user(&self, _user_id: &UserId) -> Result<usize> {
        Err(read_only_access())
    }
}

macro_rules! impl_saved_list_repo {
    ($db:ident) => {
        impl SavedListRepo for $db<'_> {
            fn create_list(&self, list: &NewSavedList) -> Result<ListId> {
                create_list(&mut self.conn.borrow_mut(), list)
            }
            fn update_list(&self, list: &SavedList) -> Result<()> {
                update_list(&mut self.conn.borrow_mut(), list)
            }
            fn delete_list(&self, id: ListId) -> Result<()> {
                delete_list(&mut self.conn.borrow_mut(), id)
            }

            fn get_list(&self, id: ListId) -> Result<SavedList> {
                get_list(&mut self.conn.borrow_mut(), id)
            }
            fn lists_of_user(
                &self,
                user_id: &UserId,
                pagination: &Pagination,
            ) -> Result<Vec<SavedList>> {
                lists_of_user(&mut self.conn.borrow_mut(), user_id, pagination)
            }

            fn add_event_to_list(&self, id: ListId, event_id: EventId) -> Result<()> {
                add_event_to_list(&mut self.conn.borrow_mut(), id, event_id)
            }
            fn remove_event_from_list(&self, id: ListId, event_id: EventId) -> Result<()> {
                remove_event_from_list(&mut self.conn.borrow_mut(), id, event_id)
            }
            fn remove_event_from_all_lists(&self, event_id: EventId) -> Result<usize> {
                remove_event_from_all_lists(&mut self.conn.borrow_mut(), event_id)
            }

            fn delete_lists_of_user(&self, user_id: &UserId) -> Result<usize> {
                delete_lists_of_user(&mut self.conn.borrow_mut(), user_id)
            }
        }
    };
}

impl_saved_list_repo!(DbReadWrite);
impl_saved_list_repo!(DbConnection);

fn load_list_events(conn: &mut SqliteConnection, list_id: i64) -> Result<BTreeSet<EventId>> {
    use schema::saved_list_events::dsl;
    Ok(dsl::saved_list_events
        .select(dsl::event_id)
        .filter(dsl::list_id.eq(list_id))
        .load::<i64>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn load_list(conn: &mut SqliteConnection, entity: models::SavedListEntity) -> Result<SavedList> {
    let models::SavedListEntity {
        id,
        owner,
        name,
        description,
    } = entity;
    let events = load_list_events(conn, id)?;
    Ok(SavedList {
        id: id.into(),
        owner: owner.into(),
        name,
        description,
        events,
    })
}

fn create_list(conn: &mut SqliteConnection, list: &NewSavedList) -> Result<ListId> {
    let new_list = models::NewSavedList {
        owner: list.owner.as_str(),
        name: &list.name,
        description: &list.description,
    };
    diesel::insert_into(schema::saved_lists::table)
        .values(&new_list)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(inserted_rowid(conn)?.into())
}

fn update_list(conn: &mut SqliteConnection, list: &SavedList) -> Result<()> {
    use schema::saved_lists::dsl;
    let count = diesel::update(dsl::saved_lists.filter(dsl::id.eq(list.id.to_inner())))
        .set((
            dsl::name.eq(&list.name),
            dsl::description.eq(&list.description),
        ))
        .execute(conn)
        .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn delete_list(conn: &mut SqliteConnection, id: ListId) -> Result<()> {
    use schema::saved_lists::dsl;
    // Entries are deleted by cascade
    let count = diesel::delete(dsl::saved_lists.filter(dsl::id.eq(id.to_inner())))
        .execute(conn)
        .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn get_list(conn: &mut SqliteConnection, id: ListId) -> Result<SavedList> {
    use schema::saved_lists::dsl;
    let entity = dsl::saved_lists
        .filter(dsl::id.eq(id.to_inner()))
        .first::<models::SavedListEntity>(conn)
        .map_err(from_diesel_err)?;
    load_list(conn, entity)
}

fn lists_of_user(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    pagination: &Pagination,
) -> Result<Vec<SavedList>> {
    use schema::saved_lists::dsl;
    let mut query = dsl::saved_lists
        .filter(dsl::owner.eq(user_id.as_str()))
        .order_by(dsl::id)
        .into_boxed();
    paginate!(query, pagination);
    let entities = query
        .load::<models::SavedListEntity>(conn)
        .map_err(from_diesel_err)?;
    entities
        .into_iter()
        .map(|entity| load_list(conn, entity))
        .collect()
}

fn add_event_to_list(conn: &mut SqliteConnection, id: ListId, event_id: EventId) -> Result<()> {
    let entry = models::NewSavedListEvent {
        list_id: id.to_inner(),
        event_id: event_id.to_inner(),
    };
    diesel::insert_into(schema::saved_list_events::table)
        .values(&entry)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn remove_event_from_list(conn: &mut SqliteConnection, id: ListId, event_id: EventId) -> Result<()> {
    use schema::saved_list_events::dsl;
    let count = diesel::delete(
        dsl::saved_list_events
            .filter(dsl::list_id.eq(id.to_inner()))
            .filter(dsl::event_id.eq(event_id.to_inner())),
    )
    .execute(conn)
    .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn remove_event_from_all_lists(conn: &mut SqliteConnection, event_id: EventId) -> Result<usize> {
    use schema::saved_list_events::dsl;
    diesel::delete(dsl::saved_list_events.filter(dsl::event_id.eq(event_id.to_inner())))
        .execute(conn)
        .map_err(from_diesel_err)
}

fn delete_lists_of_user(conn: &mut SqliteConnection, user_id: &UserId) -> Result<usize> {
    use schema::saved_lists::dsl;
    diesel::delete(dsl::saved_lists.filter(dsl::owner.eq(user_id.as_str())))
        .execute(conn)
        .map_err(from_diesel_err)
}
