use super::*;

impl SessionRepo for DbReadOnly<'_> {
    fn create_session(&self, _session: &Session) -> Result<()> {
        Err(read_only_access())
    }
    fn delete_session_of_user(&self, _user_id: &UserId) -> Result<usize> {
        Err(read_only_access())
    }

    fn try_get_session_of_user(&self, user_id: &UserId) -> Result<Option<Session>> {
        try_get_session_of_user(&mut self.conn.borrow_mut(), user_id)
    }
    fn try_get_session_by_token(&self, token: &str) -> Result<Option<Session>> {
        try_get_session_by_token(&mut self.conn.borrow_mut(), token)
    }
    fn all_logged_in_user_ids(&self) -> Result<Vec<UserId>> {
        all_logged_in_user_ids(&mut self.conn.borrow_mut())
    }
}

macro_rules! impl_session_repo {
    ($db:ident) => {
        impl SessionRepo for $db<'_> {
            fn create_session(&self, session: &Session) -> Result<()> {
                create_session(&mut self.conn.borrow_mut(), session)
            }
            fn delete_session_of_user(&self, user_id: &UserId) -> Result<usize> {
                delete_session_of_user(&mut self.conn.borrow_mut(), user_id)
            }

            fn try_get_session_of_user(&self, user_id: &UserId) -> Result<Option<Session>> {
                try_get_session_of_user(&mut self.conn.borrow_mut(), user_id)
            }
            fn try_get_session_by_token(&self, token: &str) -> Result<Option<Session>> {
                try_get_session_by_token(&mut self.conn.borrow_mut(), token)
            }
            fn all_logged_in_user_ids(&self) -> Result<Vec<UserId>> {
                all_logged_in_user_ids(&mut self.conn.borrow_mut())
            }
        }
    };
}

impl_session_repo!(DbReadWrite);
impl_session_repo!(DbConnection);

impl From<models::SessionEntity> for Session {
    fn from(from: models::SessionEntity) -> Self {
        let models::SessionEntity {
            user_id,
            token,
            device_token,
        } = from;
        Self {
            user_id: user_id.into(),
            token,
            device_token,
        }
    }
}

fn create_session(conn: &mut SqliteConnection, session: &Session) -> Result<()> {
    let new_session = models::SessionEntity {
        user_id: session.user_id.to_string(),
        token: session.token.clone(),
        device_token: session.device_token.clone(),
    };
    diesel::insert_into(schema::sessions::table)
        .values(&new_session)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn delete_session_of_user(conn: &mut SqliteConnection, user_id: &UserId) -> Result<usize> {
    use schema::sessions::dsl;
    diesel::delete(dsl::sessions.filter(dsl::user_id.eq(user_id.as_str())))
        .execute(conn)
        .map_err(from_diesel_err)
}

fn try_get_session_of_user(conn: &mut SqliteConnection, user_id: &UserId) -> Result<Option<Session>> {
    use schema::sessions::dsl;
    Ok(dsl::sessions
        .filter(dsl::user_id.eq(user_id.as_str()))
        .first::<models::SessionEntity>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(Into::into))
}

fn try_get_session_by_token(conn: &mut SqliteConnection, token: &str) -> Result<Option<Session>> {
    use schema::sessions::dsl;
    Ok(dsl::sessions
        .filter(dsl::token.eq(token))
        .first::<models::SessionEntity>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(Into::into))
}

fn all_logged_in_user_ids(conn: &mut SqliteConnection) -> Result<Vec<UserId>> {
    use schema::sessions::dsl;
    Ok(dsl::sessions
        .select(dsl::user_id)
        .order_by(dsl::user_id)
        .load::<String>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}
