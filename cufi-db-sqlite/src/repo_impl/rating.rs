use super::*;

impl RatingRepo for DbReadOnly<'_> {
    fn create_rating(&self, _rating: &Rating) -> Result<()> {
        Err(read_only_access())
    }
    fn delete_rating(&self, _event_id: EventId, _user_id: &UserId) -> Result<()> {
        Err(read_only_access())
    }

    fn try_get_rating(&self, event_id: EventId, user_id: &UserId) -> Result<Option<Rating>> {
        try_get_rating(&mut self.conn.borrow_mut(), event_id, user_id)
    }
    fn load_ratings_of_event(&self, event_id: EventId) -> Result<Vec<Rating>> {
        load_ratings_of_event(&mut self.conn.borrow_mut(), event_id)
    }

    fn delete_ratings_of_user(&self, _user_id: &UserId) -> Result<usize> {
        Err(read_only_access())
    }
    fn delete_ratings_of_event(&self, _event_id: EventId) -> Result<usize> {
        Err(read_only_access())
    }
}

macro_rules! impl_rating_repo {
    ($db:ident) => {
        impl RatingRepo for $db<'_> {
            fn create_rating(&self, rating: &Rating) -> Result<()> {
                create_rating(&mut self.conn.borrow_mut(), rating)
            }
            fn delete_rating(&self, event_id: EventId, user_id: &UserId) -> Result<()> {
                delete_rating(&mut self.conn.borrow_mut(), event_id, user_id)
            }

            fn try_get_rating(
                &self,
                event_id: EventId,
                user_id: &UserId,
            ) -> Result<Option<Rating>> {
                try_get_rating(&mut self.conn.borrow_mut(), event_id, user_id)
            }
            fn load_ratings_of_event(&self, event_id: EventId) -> Result<Vec<Rating>> {
                load_ratings_of_event(&mut self.conn.borrow_mut(), event_id)
            }

            fn delete_ratings_of_user(&self, user_id: &UserId) -> Result<usize> {
                delete_ratings_of_user(&mut self.conn.borrow_mut(), user_id)
            }
            fn delete_ratings_of_event(&self, event_id: EventId) -> Result<usize> {
                delete_ratings_of_event(&mut self.conn.borrow_mut(), event_id)
            }
        }
    };
}

impl_rating_repo!(DbReadWrite);
impl_rating_repo!(DbConnection);

impl From<models::EventRating> for Rating {
    fn from(from: models::EventRating) -> Self {
        let models::EventRating {
            event_id,
            user_id,
            score,
        } = from;
        Self {
            event_id: event_id.into(),
            user_id: user_id.into(),
            score,
        }
    }
}

fn create_rating(conn: &mut SqliteConnection, rating: &Rating) -> Result<()> {
    let new_rating = models::EventRating {
        event_id: rating.event_id.to_inner(),
        user_id: rating.user_id.to_string(),
        score: rating.score,
    };
    diesel::insert_into(schema::event_ratings::table)
        .values(&new_rating)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn delete_rating(conn: &mut SqliteConnection, event_id: EventId, user_id: &UserId) -> Result<()> {
    use schema::event_ratings::dsl;
    let count = diesel::delete(
        dsl::event_ratings
            .filter(dsl::event_id.eq(event_id.to_inner()))
            .filter(dsl::user_id.eq(user_id.as_str())),
    )
    .execute(conn)
    .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn try_get_rating(
    conn: &mut SqliteConnection,
    event_id: EventId,
    user_id: &UserId,
) -> Result<Option<Rating>> {
    use schema::event_ratings::dsl;
    Ok(dsl::event_ratings
        .filter(dsl::event_id.eq(event_id.to_inner()))
        .filter(dsl::user_id.eq(user_id.as_str()))
        .first::<models::EventRating>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(Into::into))
}

fn load_ratings_of_event(conn: &mut SqliteConnection, event_id: EventId) -> Result<Vec<Rating>> {
    use schema::event_ratings::dsl;
    Ok(dsl::event_ratings
        .filter(dsl::event_id.eq(event_id.to_inner()))
        .load::<models::EventRating>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn delete_ratings_of_user(conn: &mut SqliteConnection, user_id: &UserId) -> Result<usize> {
    use schema::event_ratings::dsl;
    diesel::delete(dsl::event_ratings.filter(dsl::user_id.eq(user_id.as_str())))
        .execute(conn)
        .map_err(from_diesel_err)
}

fn delete_ratings_of_event(conn: &mut SqliteConnection, event_id: EventId) -> Result<usize> {
    use schema::event_ratings::dsl;
    diesel::delete(dsl::event_ratings.filter(dsl::event_id.eq(event_id.to_inner())))
        .execute(conn)
        .map_err(from_diesel_err)
}
