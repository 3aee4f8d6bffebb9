use super::*;

impl EventRepo for DbReadOnly<'_> {
    fn create_event(&self, _details: &EventDetails) -> Result<EventId> {
        Err(read_only_access())
    }
    fn update_event(&self, _event: &Event) -> Result<()> {
        Err(read_only_access())
    }
    fn delete_event(&self, _id: EventId) -> Result<()> {
        Err(read_only_access())
    }

    fn get_event(&self, id: EventId) -> Result<Event> {
        get_event(&mut self.conn.borrow_mut(), id)
    }
    fn try_get_event(&self, id: EventId) -> Result<Option<Event>> {
        try_get_event(&mut self.conn.borrow_mut(), id)
    }
    fn exists_event_with_key(&self, key: &EventKey) -> Result<bool> {
        exists_event_with_key(&mut self.conn.borrow_mut(), key)
    }
    fn all_events(&self, pagination: &Pagination) -> Result<Vec<Event>> {
        all_events(&mut self.conn.borrow_mut(), pagination)
    }
    fn query_events(&self, filter: &EventFilter, pagination: &Pagination) -> Result<Vec<Event>> {
        query_events(&mut self.conn.borrow_mut(), filter, pagination)
    }
    fn events_tagged_with(
        &self,
        tag: &str,
        since: Date,
        pagination: &Pagination,
    ) -> Result<Vec<Event>> {
        events_tagged_with(&mut self.conn.borrow_mut(), tag, since, pagination)
    }
    fn all_taxonomy_values(&self) -> Result<Vec<String>> {
        all_taxonomy_values(&mut self.conn.borrow_mut())
    }
}

macro_rules! impl_event_repo {
    ($db:ident) => {
        impl EventRepo for $db<'_> {
            fn create_event(&self, details: &EventDetails) -> Result<EventId> {
                create_event(&mut self.conn.borrow_mut(), details)
            }
            fn update_event(&self, event: &Event) -> Result<()> {
                update_event(&mut self.conn.borrow_mut(), event)
            }
            fn delete_event(&self, id: EventId) -> Result<()> {
                delete_event(&mut self.conn.borrow_mut(), id)
            }

            fn get_event(&self, id: EventId) -> Result<Event> {
                get_event(&mut self.conn.borrow_mut(), id)
            }
            fn try_get_event(&self, id: EventId) -> Result<Option<Event>> {
                try_get_event(&mut self.conn.borrow_mut(), id)
            }
            fn exists_event_with_key(&self, key: &EventKey) -> Result<bool> {
                exists_event_with_key(&mut self.conn.borrow_mut(), key)
            }
            fn all_events(&self, pagination: &Pagination) -> Result<Vec<Event>> {
                all_events(&mut self.conn.borrow_mut(), pagination)
            }
            fn query_events(
                &self,
                filter: &EventFilter,
                pagination: &Pagination,
            ) -> Result<Vec<Event>> {
                query_events(&mut self.conn.borrow_mut(), filter, pagination)
            }
            fn events_tagged_with(
                &self,
                tag: &str,
                since: Date,
                pagination: &Pagination,
            ) -> Result<Vec<Event>> {
                events_tagged_with(&mut self.conn.borrow_mut(), tag, since, pagination)
            }
            fn all_taxonomy_values(&self) -> Result<Vec<String>> {
                all_taxonomy_values(&mut self.conn.borrow_mut())
            }
        }
    };
}

impl_event_repo!(DbReadWrite);
impl_event_repo!(DbConnection);

fn new_event(details: &EventDetails) -> models::NewEvent<'_> {
    let EventDetails {
        start_date,
        end_date,
        denomination,
        description,
        price,
        schedule,
        subtitle,
        ambit,
        category,
        other_categories,
        link,
        images,
        address,
        region,
        email,
        space,
        latitude,
        longitude,
        phone,
        app_image,
    } = details;
    models::NewEvent {
        start_date: format_iso_date(*start_date),
        end_date: format_iso_date(*end_date),
        denomination,
        description,
        price,
        schedule,
        subtitle,
        ambit,
        category,
        other_categories,
        link,
        images,
        address,
        region,
        email,
        space,
        latitude: *latitude,
        longitude: *longitude,
        phone,
        app_image,
    }
}

fn load_event(entity: models::EventEntity) -> Result<Event> {
    let models::EventEntity {
        id,
        start_date,
        end_date,
        denomination,
        description,
        price,
        schedule,
        subtitle,
        ambit,
        category,
        other_categories,
        link,
        images,
        address,
        region,
        email,
        space,
        latitude,
        longitude,
        phone,
        app_image,
    } = entity;
    let details = EventDetails {
        start_date: load_date(&start_date)?,
        end_date: load_date(&end_date)?,
        denomination,
        description,
        price,
        schedule,
        subtitle,
        ambit,
        category,
        other_categories,
        link,
        images,
        address,
        region,
        email,
        space,
        latitude,
        longitude,
        phone,
        app_image,
    };
    Ok(Event {
        id: id.into(),
        details,
    })
}

fn load_events(entities: Vec<models::EventEntity>) -> Result<Vec<Event>> {
    entities.into_iter().map(load_event).collect()
}

fn create_event(conn: &mut SqliteConnection, details: &EventDetails) -> Result<EventId> {
    diesel::insert_into(schema::events::table)
        .values(&new_event(details))
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(inserted_rowid(conn)?.into())
}

fn update_event(conn: &mut SqliteConnection, event: &Event) -> Result<()> {
    use schema::events::dsl;
    let count = diesel::update(dsl::events.filter(dsl::id.eq(event.id.to_inner())))
        .set(&new_event(&event.details))
        .execute(conn)
        .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn delete_event(conn: &mut SqliteConnection, id: EventId) -> Result<()> {
    use schema::events::dsl;
    let count = diesel::delete(dsl::events.filter(dsl::id.eq(id.to_inner())))
        .execute(conn)
        .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn get_event(conn: &mut SqliteConnection, id: EventId) -> Result<Event> {
    try_get_event(conn, id)?.ok_or(repo::Error::NotFound)
}

fn try_get_event(conn: &mut SqliteConnection, id: EventId) -> Result<Option<Event>> {
    use schema::events::dsl;
    dsl::events
        .filter(dsl::id.eq(id.to_inner()))
        .first::<models::EventEntity>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(load_event)
        .transpose()
}

fn exists_event_with_key(conn: &mut SqliteConnection, key: &EventKey) -> Result<bool> {
    use schema::events::dsl;
    let query = dsl::events
        .filter(dsl::start_date.eq(format_iso_date(key.start_date)))
        .filter(dsl::end_date.eq(format_iso_date(key.end_date)))
        .filter(dsl::denomination.eq(key.denomination))
        .filter(dsl::description.eq(key.description));
    diesel::select(diesel::dsl::exists(query))
        .get_result(conn)
        .map_err(from_diesel_err)
}

fn all_events(conn: &mut SqliteConnection, pagination: &Pagination) -> Result<Vec<Event>> {
    use schema::events::dsl;
    let mut query = dsl::events.order_by(dsl::id).into_boxed();
    paginate!(query, pagination);
    load_events(query.load(conn).map_err(from_diesel_err)?)
}

fn query_events(
    conn: &mut SqliteConnection,
    filter: &EventFilter,
    pagination: &Pagination,
) -> Result<Vec<Event>> {
    use diesel::{dsl::sql, sql_types::Double};
    use schema::events::dsl;

    let mut query = dsl::events.order_by(dsl::id).into_boxed();

    for (field, text) in filter.text_criteria() {
        let text = text.to_owned();
        query = match field {
            TextField::Ambit => query.filter(instr(dsl::ambit, text).gt(0)),
            TextField::Category => query.filter(instr(dsl::category, text).gt(0)),
            TextField::OtherCategories => query.filter(instr(dsl::other_categories, text).gt(0)),
            TextField::Price => query.filter(instr(dsl::price, text).gt(0)),
            TextField::Denomination => query.filter(instr(dsl::denomination, text).gt(0)),
            TextField::Region => query.filter(instr(dsl::region, text).gt(0)),
            TextField::Description => query.filter(instr(dsl::description, text).gt(0)),
        };
    }

    // Inclusive date range
    if let Some(from) = filter.date_from {
        query = query.filter(dsl::start_date.ge(format_iso_date(from)));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(dsl::end_date.le(format_iso_date(to)));
    }

    // The radius is compared with the squared distance
    if let Some(circle) = filter.geo_circle() {
        let within_radius = sql::<diesel::sql_types::Bool>("((latitude - ")
            .bind::<Double, _>(circle.latitude)
            .sql(") * (latitude - ")
            .bind::<Double, _>(circle.latitude)
            .sql(") + (longitude - ")
            .bind::<Double, _>(circle.longitude)
            .sql(") * (longitude - ")
            .bind::<Double, _>(circle.longitude)
            .sql(")) <= ")
            .bind::<Double, _>(circle.radius);
        query = query.filter(within_radius);
    }

    paginate!(query, pagination);
    load_events(query.load(conn).map_err(from_diesel_err)?)
}

fn events_tagged_with(
    conn: &mut SqliteConnection,
    tag: &str,
    since: Date,
    pagination: &Pagination,
) -> Result<Vec<Event>> {
    use schema::events::dsl;
    let mut query = dsl::events
        .filter(dsl::start_date.ge(format_iso_date(since)))
        .filter(
            instr(dsl::ambit, tag)
                .gt(0)
                .or(instr(dsl::category, tag).gt(0))
                .or(instr(dsl::other_categories, tag).gt(0)),
        )
        .order_by(dsl::id)
        .into_boxed();
    paginate!(query, pagination);
    load_events(query.load(conn).map_err(from_diesel_err)?)
}

fn all_taxonomy_values(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    use schema::events::dsl;
    let rows = dsl::events
        .select((dsl::ambit, dsl::category, dsl::other_categories))
        .load::<(String, String, String)>(conn)
        .map_err(from_diesel_err)?;
    Ok(rows
        .into_iter()
        .flat_map(|(ambit, category, other_categories)| [ambit, category, other_categories])
        .collect())
}
