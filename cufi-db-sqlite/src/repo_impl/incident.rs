use super::*;

impl IncidentRepo for DbReadOnly<'_> {
    fn create_incident(&self, _incident: &NewIncident) -> Result<IncidentId> {
        Err(read_only_access())
    }
    fn update_incident(&self, _incident: &Incident) -> Result<()> {
        Err(read_only_access())
    }
    fn delete_incident(&self, _id: IncidentId) -> Result<()> {
        Err(read_only_access())
    }

    fn get_incident(&self, id: IncidentId) -> Result<Incident> {
        get_incident(&mut self.conn.borrow_mut(), id)
    }
    fn query_incidents(
        &self,
        query: &IncidentQuery,
        pagination: &Pagination,
    ) -> Result<Vec<Incident>> {
        query_incidents(&mut self.conn.borrow_mut(), query, pagination)
    }

    fn delete_incidents(&self, _query: &IncidentQuery) -> Result<usize> {
        Err(read_only_access())
    }
}

macro_rules! impl_incident_repo {
    ($db:ident) => {
        impl IncidentRepo for $db<'_> {
            fn create_incident(&self, incident: &NewIncident) -> Result<IncidentId> {
                create_incident(&mut self.conn.borrow_mut(), incident)
            }
            fn update_incident(&self, incident: &Incident) -> Result<()> {
                update_incident(&mut self.conn.borrow_mut(), incident)
            }
            fn delete_incident(&self, id: IncidentId) -> Result<()> {
                delete_incident(&mut self.conn.borrow_mut(), id)
            }

            fn get_incident(&self, id: IncidentId) -> Result<Incident> {
                get_incident(&mut self.conn.borrow_mut(), id)
            }
            fn query_incidents(
                &self,
                query: &IncidentQuery,
                pagination: &Pagination,
            ) -> Result<Vec<Incident>> {
                query_incidents(&mut self.conn.borrow_mut(), query, pagination)
            }

            fn delete_incidents(&self, query: &IncidentQuery) -> Result<usize> {
                delete_incidents(&mut self.conn.borrow_mut(), query)
            }
        }
    };
}

impl_incident_repo!(DbReadWrite);
impl_incident_repo!(DbConnection);

impl From<models::IncidentEntity> for Incident {
    fn from(from: models::IncidentEntity) -> Self {
        let models::IncidentEntity {
            id,
            user_id,
            event_id,
            description,
            response,
            resolved,
        } = from;
        Self {
            id: id.into(),
            user_id: user_id.into(),
            event_id: event_id.into(),
            description,
            response,
            resolved,
        }
    }
}

fn create_incident(conn: &mut SqliteConnection, incident: &NewIncident) -> Result<IncidentId> {
    let new_incident = models::NewIncident {
        user_id: incident.user_id.as_str(),
        event_id: incident.event_id.to_inner(),
        description: &incident.description,
    };
    diesel::insert_into(schema::incidents::table)
        .values(&new_incident)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(inserted_rowid(conn)?.into())
}

fn update_incident(conn: &mut SqliteConnection, incident: &Incident) -> Result<()> {
    use schema::incidents::dsl;
    let count = diesel::update(dsl::incidents.filter(dsl::id.eq(incident.id.to_inner())))
        .set((
            dsl::description.eq(&incident.description),
            dsl::response.eq(&incident.response),
            dsl::resolved.eq(incident.resolved),
        ))
        .execute(conn)
        .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn delete_incident(conn: &mut SqliteConnection, id: IncidentId) -> Result<()> {
    use schema::incidents::dsl;
    let count = diesel::delete(dsl::incidents.filter(dsl::id.eq(id.to_inner())))
        .execute(conn)
        .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn get_incident(conn: &mut SqliteConnection, id: IncidentId) -> Result<Incident> {
    use schema::incidents::dsl;
    Ok(dsl::incidents
        .filter(dsl::id.eq(id.to_inner()))
        .first::<models::IncidentEntity>(conn)
        .map_err(from_diesel_err)?
        .into())
}

fn query_incidents(
    conn: &mut SqliteConnection,
    params: &IncidentQuery,
    pagination: &Pagination,
) -> Result<Vec<Incident>> {
    use schema::incidents::dsl;
    let mut query = dsl::incidents.order_by(dsl::id).into_boxed();
    if let Some(user_id) = params.user_id {
        query = query.filter(dsl::user_id.eq(user_id.as_str()));
    }
    if let Some(event_id) = params.event_id {
        query = query.filter(dsl::event_id.eq(event_id.to_inner()));
    }
    if let Some(resolved) = params.resolved {
        query = query.filter(dsl::resolved.eq(resolved));
    }
    paginate!(query, pagination);
    Ok(query
        .load::<models::IncidentEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn delete_incidents(conn: &mut SqliteConnection, params: &IncidentQuery) -> Result<usize> {
    use schema::incidents::dsl;
    let mut query = diesel::delete(dsl::incidents).into_boxed();
    if let Some(user_id) = params.user_id {
        query = query.filter(dsl::user_id.eq(user_id.as_str()));
    }
    if let Some(event_id) = params.event_id {
        query = query.filter(dsl::event_id.eq(event_id.to_inner()));
    }
    query.execute(conn).map_err(from_diesel_err)
}
