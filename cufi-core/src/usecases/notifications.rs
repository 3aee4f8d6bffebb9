use std::collections::BTreeSet;

use super::prelude::*;
use crate::gateways::notify::PushNotificationGateway;

pub const NEAR_EVENTS_TITLE: &str = "Esdeveniments propers";
pub const NEAR_EVENTS_BODY: &str =
    "Algun esdeveniment al que assisteixes s'aproxima! Comprova-ho a la app!";

// Only the first page of assistances is inspected.
const NEAR_EVENTS_SCAN: Pagination = Pagination::page(0, 10);

/// Send a push notification to the device of the user's session.
///
/// Returns `false` if the user has no registered device.
pub fn send_notification<R, G>(
    repo: &R,
    gateway: &G,
    user_id: &UserId,
    title: &str,
    body: &str,
) -> Result<bool>
where
    R: UserRepo + SessionRepo,
    G: PushNotificationGateway + ?Sized,
{
    if repo.try_get_user(user_id)?.is_none() {
        return Err(Error::UserNotFound);
    }
    let Some(device_token) = repo.device_token_of_user(user_id)? else {
        log::debug!("User {user_id} has no device for notifications");
        return Ok(false);
    };
    gateway
        .send_push(&device_token, title, body)
        .map_err(Error::Notification)?;
    Ok(true)
}

/// Users attending an event that starts tomorrow.
pub fn near_event_attendees<R>(repo: &R, today: Date) -> Result<BTreeSet<UserId>>
where
    R: AssistanceRepo + EventRepo,
{
    let tomorrow = today.next_day();
    let mut user_ids = BTreeSet::new();
    for assistance in repo.all_assistances(&NEAR_EVENTS_SCAN)? {
        let event = repo
            .get_event(assistance.event_id)
            .map_err(not_found_as(Error::EventNotFound))?;
        if Some(event.details.start_date) == tomorrow {
            user_ids.insert(assistance.user_id);
        }
    }
    Ok(user_ids)
}

/// Notify every user once that attends an event starting tomorrow.
///
/// Returns the number of sent notifications.
pub fn notify_near_events<R, G>(repo: &R, gateway: &G, today: Date) -> Result<usize>
where
    R: AssistanceRepo + EventRepo + UserRepo + SessionRepo,
    G: PushNotificationGateway + ?Sized,
{
    let user_ids = near_event_attendees(repo, today)?;
    Ok(notify_users(repo, gateway, &user_ids))
}

/// Send the near events notification to all logged in users.
pub fn notify_all_logged_in_users<R, G>(repo: &R, gateway: &G, identity: &Identity) -> Result<usize>
where
    R: UserRepo + SessionRepo,
    G: PushNotificationGateway + ?Sized,
{
    identity.require_admin()?;
    let user_ids = repo.all_logged_in_user_ids()?;
    Ok(notify_users(repo, gateway, &user_ids))
}

fn notify_users<'a, R, G>(
    repo: &R,
    gateway: &G,
    user_ids: impl IntoIterator<Item = &'a UserId>,
) -> usize
where
    R: UserRepo + SessionRepo,
    G: PushNotificationGateway + ?Sized,
{
    let mut sent = 0;
    for user_id in user_ids {
        match send_notification(repo, gateway, user_id, NEAR_EVENTS_TITLE, NEAR_EVENTS_BODY) {
            Ok(true) => sent += 1,
            Ok(false) => {}
            Err(err) => log::warn!("Unable to notify user {user_id}: {err}"),
        }
    }
    sent
}

#[cfg(test)]
mod tests {
    use super::{
        super::{tests::*, *},
        *,
    };
    use cufi_entities::builders::*;
    use time::macros::date;

    const TODAY: Date = date!(2024 - 06 - 01);

    fn setup_user(db: &MockDb, id: &str, device: Option<&str>) {
        db.users.borrow_mut().push(User::build().id(id).finish());
        db.create_session(&Session {
            user_id: id.into(),
            token: format!("token-{id}"),
            device_token: device.map(ToOwned::to_owned),
        })
        .unwrap();
    }

    fn attend(db: &MockDb, user_id: &str, event_id: EventId) {
        db.create_assistance(&Assistance {
            user_id: user_id.into(),
            event_id,
        })
        .unwrap();
    }

    #[test]
    fn notify_each_attendee_once() {
        let db = MockDb::default();
        let gw = MockNotificationGateway::default();
        setup_user(&db, "alice", Some("dev-a"));
        setup_user(&db, "bob", Some("dev-b"));
        let tomorrow_1 = db
            .create_event(&EventDetails::build().denomination("1").dates(date!(2024 - 06 - 02)).finish())
            .unwrap();
        let tomorrow_2 = db
            .create_event(&EventDetails::build().denomination("2").dates(date!(2024 - 06 - 02)).finish())
            .unwrap();
        let later = db
            .create_event(&EventDetails::build().denomination("3").dates(date!(2024 - 06 - 03)).finish())
            .unwrap();
        attend(&db, "alice", tomorrow_1);
        attend(&db, "alice", tomorrow_2);
        attend(&db, "bob", later);

        assert_eq!(notify_near_events(&db, &gw, TODAY).unwrap(), 1);
        let sent = gw.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "dev-a");
        assert_eq!(sent[0].1, NEAR_EVENTS_TITLE);
    }

    #[test]
    fn scan_only_the_first_page_of_assistances() {
        let db = MockDb::default();
        let far = db
            .create_event(&EventDetails::build().denomination("far").dates(date!(2024 - 07 - 01)).finish())
            .unwrap();
        let near = db
            .create_event(&EventDetails::build().denomination("near").dates(date!(2024 - 06 - 02)).finish())
            .unwrap();
        for i in 0..10 {
            attend(&db, &format!("user{i}"), far);
        }
        attend(&db, "late", near);
        assert!(near_event_attendees(&db, TODAY).unwrap().is_empty());
    }

    #[test]
    fn skip_users_without_device() {
        let db = MockDb::default();
        let gw = MockNotificationGateway::default();
        setup_user(&db, "alice", None);
        let id = db
            .create_event(&EventDetails::build().dates(date!(2024 - 06 - 02)).finish())
            .unwrap();
        attend(&db, "alice", id);
        assert_eq!(notify_near_events(&db, &gw, TODAY).unwrap(), 0);
        assert!(gw.sent.borrow().is_empty());
    }

    #[test]
    fn continue_after_failed_dispatch() {
        let db = MockDb::default();
        let gw = MockNotificationGateway {
            fail: true,
            ..Default::default()
        };
        setup_user(&db, "alice", Some("dev-a"));
        let id = db
            .create_event(&EventDetails::build().dates(date!(2024 - 06 - 02)).finish())
            .unwrap();
        attend(&db, "alice", id);
        assert_eq!(notify_near_events(&db, &gw, TODAY).unwrap(), 0);
        assert!(matches!(
            send_notification(&db, &gw, &"alice".into(), "t", "b"),
            Err(Error::Notification(_))
        ));
    }

    #[test]
    fn fail_on_dangling_assistance() {
        let db = MockDb::default();
        attend(&db, "alice", EventId::new(3));
        assert!(matches!(
            near_event_attendees(&db, TODAY),
            Err(Error::EventNotFound)
        ));
    }

    #[test]
    fn only_admins_notify_all_users() {
        let db = MockDb::default();
        let gw = MockNotificationGateway::default();
        setup_user(&db, "alice", Some("dev-a"));
        setup_user(&db, "bob", Some("dev-b"));
        let user = Identity {
            user_id: "alice".into(),
            is_admin: false,
        };
        let err = notify_all_logged_in_users(&db, &gw, &user).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        let admin = Identity {
            is_admin: true,
            ..user
        };
        assert_eq!(notify_all_logged_in_users(&db, &gw, &admin).unwrap(), 2);
    }

    #[test]
    fn notify_unknown_user() {
        let db = MockDb::default();
        let gw = MockNotificationGateway::default();
        assert!(matches!(
            send_notification(&db, &gw, &"ghost".into(), "t", "b"),
            Err(Error::UserNotFound)
        ));
    }
}
