use super::*;

impl UserRepo for DbReadOnly<'_> {
    fn create_user(&self, _user: &User) -> Result<()> {
        Err(read_only_access())
    }
    fn update_user(&self, _user: &User) -> Result<()> {
        Err(read_only_access())
    }
    fn delete_user(&self, _id: &UserId) -> Result<()> {
        Err(read_only_access())
    }

    fn get_user(&self, id: &UserId) -> Result<User> {
        get_user(&mut self.conn.borrow_mut(), id)
    }
    fn try_get_user(&self, id: &UserId) -> Result<Option<User>> {
        try_get_user(&mut self.conn.borrow_mut(), id)
    }
    fn all_users(&self, pagination: &Pagination) -> Result<Vec<User>> {
        all_users(&mut self.conn.borrow_mut(), pagination)
    }
}

macro_rules! impl_user_repo {
    ($db:ident) => {
        impl UserRepo for $db<'_> {
            fn create_user(&self, user: &User) -> Result<()> {
                create_user(&mut self.conn.borrow_mut(), user)
            }
            fn update_user(&self, user: &User) -> Result<()> {
                update_user(&mut self.conn.borrow_mut(), user)
            }
            fn delete_user(&self, id: &UserId) -> Result<()> {
                delete_user(&mut self.conn.borrow_mut(), id)
            }

            fn get_user(&self, id: &UserId) -> Result<User> {
                get_user(&mut self.conn.borrow_mut(), id)
            }
            fn try_get_user(&self, id: &UserId) -> Result<Option<User>> {
                try_get_user(&mut self.conn.borrow_mut(), id)
            }
            fn all_users(&self, pagination: &Pagination) -> Result<Vec<User>> {
                all_users(&mut self.conn.borrow_mut(), pagination)
            }
        }
    };
}

impl_user_repo!(DbReadWrite);
impl_user_repo!(DbConnection);

impl From<&User> for models::UserEntity {
    fn from(from: &User) -> Self {
        let User {
            id,
            name,
            birth_date,
            profile_image,
            preferred_categories,
            is_admin,
        } = from;
        Self {
            id: id.to_string(),
            name: name.clone(),
            birth_date: birth_date.clone(),
            profile_image: profile_image.clone(),
            preferred_categories: preferred_categories.clone(),
            is_admin: *is_admin,
        }
    }
}

impl From<models::UserEntity> for User {
    fn from(from: models::UserEntity) -> Self {
        let models::UserEntity {
            id,
            name,
            birth_date,
            profile_image,
            preferred_categories,
            is_admin,
        } = from;
        Self {
            id: id.into(),
            name,
            birth_date,
            profile_image,
            preferred_categories,
            is_admin,
        }
    }
}

fn create_user(conn: &mut SqliteConnection, u: &User) -> Result<()> {
    let new_user = models::UserEntity::from(u);
    diesel::insert_into(schema::users::table)
        .values(&new_user)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn update_user(conn: &mut SqliteConnection, u: &User) -> Result<()> {
    use schema::users::dsl;
    let user = models::UserEntity::from(u);
    let count = diesel::update(dsl::users.filter(dsl::id.eq(&user.id)))
        .set(&user)
        .execute(conn)
        .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn delete_user(conn: &mut SqliteConnection, id: &UserId) -> Result<()> {
    use schema::users::dsl;
    let count = diesel::delete(dsl::users.filter(dsl::id.eq(id.as_str())))
        .execute(conn)
        .map_err(from_diesel_err)?;
    expect_single_row(count)
}

fn get_user(conn: &mut SqliteConnection, id: &UserId) -> Result<User> {
    use schema::users::dsl;
    Ok(dsl::users
        .filter(dsl::id.eq(id.as_str()))
        .first::<models::UserEntity>(conn)
        .map_err(from_diesel_err)?
        .into())
}

fn try_get_user(conn: &mut SqliteConnection, id: &UserId) -> Result<Option<User>> {
    use schema::users::dsl;
    Ok(dsl::users
        .filter(dsl::id.eq(id.as_str()))
        .first::<models::UserEntity>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(Into::into))
}

fn all_users(conn: &mut SqliteConnection, pagination: &Pagination) -> Result<Vec<User>> {
    use schema::users::dsl;
    let mut query = dsl::users.order_by(dsl::id).into_boxed();
    paginate!(query, pagination);
    Ok(query
        .load::<models::UserEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}
