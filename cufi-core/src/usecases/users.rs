use super::prelude::*;

#[rustfmt::skip]
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub id                   : String,
    pub name                 : String,
    pub birth_date           : String,
    pub profile_image        : String,
    pub preferred_categories : String,
}

/// Fields of a profile that should be replaced.
///
/// Missing or empty values keep the current value.
#[rustfmt::skip]
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name                 : Option<String>,
    pub birth_date           : Option<String>,
    pub profile_image        : Option<String>,
    pub preferred_categories : Option<String>,
}

/// Register a new user together with the favorites list.
pub fn register_user<R>(repo: &R, new_user: NewUser) -> Result<User>
where
    R: UserRepo + SavedListRepo,
{
    let NewUser {
        id,
        name,
        birth_date,
        profile_image,
        preferred_categories,
    } = new_user;
    let id = UserId::from(id);
    if !id.is_valid() {
        return Err(Error::InvalidUserId);
    }
    if repo.try_get_user(&id)?.is_some() {
        return Err(Error::UserExists);
    }
    let user = User {
        id,
        name,
        birth_date,
        profile_image,
        preferred_categories,
        is_admin: false,
    };
    repo.create_user(&user).map_err(exists_as(Error::UserExists))?;
    repo.create_list(&NewSavedList {
        owner: user.id.clone(),
        name: FAVORITES_LIST_NAME.to_owned(),
        description: FAVORITES_LIST_DESCRIPTION.to_owned(),
    })?;
    log::info!("Registered new user {}", user.id);
    Ok(user)
}

pub fn get_profile<R: UserRepo>(repo: &R, user_id: &UserId) -> Result<User> {
    repo.get_user(user_id).map_err(not_found_as(Error::UserNotFound))
}

pub fn update_profile<R: UserRepo>(
    repo: &R,
    identity: &Identity,
    update: ProfileUpdate,
) -> Result<User> {
    let mut user = get_profile(repo, &identity.user_id)?;
    let ProfileUpdate {
        name,
        birth_date,
        profile_image,
        preferred_categories,
    } = update;
    let fields = [
        (&mut user.name, name),
        (&mut user.birth_date, birth_date),
        (&mut user.profile_image, profile_image),
        (&mut user.preferred_categories, preferred_categories),
    ];
    for (field, value) in fields {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            *field = value;
        }
    }
    repo.update_user(&user)?;
    Ok(user)
}

pub fn all_users<R: UserRepo>(repo: &R, pagination: &Pagination) -> Result<Vec<User>> {
    Ok(repo.all_users(pagination)?)
}

/// Delete the calling user including everything that is owned
/// by this user.
///
/// Should be executed within a single transaction.
pub fn delete_user<R>(repo: &R, identity: &Identity) -> Result<()>
where
    R: UserRepo + SessionRepo + SavedListRepo + AssistanceRepo + RatingRepo,
{
    let user_id = &identity.user_id;
    if repo.try_get_user(user_id)?.is_none() {
        return Err(Error::UserNotFound);
    }
    let assistances = repo.delete_assistances_of_user(user_id)?;
    let ratings = repo.delete_ratings_of_user(user_id)?;
    let lists = repo.delete_lists_of_user(user_id)?;
    let sessions = repo.delete_session_of_user(user_id)?;
    repo.delete_user(user_id)?;
    log::info!(
        "Deleted user {user_id} with {assistances} assistance(s), {ratings} rating(s), {lists} list(s) and {sessions} session(s)"
    );
    Ok(())
}
