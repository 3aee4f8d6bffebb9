mod daily_job;

pub mod prelude {
    use std::cell::RefCell;

    use anyhow::anyhow;

    pub use cufi_core::{
        entities::*,
        filter::EventFilter,
        gateways::{feed::EventFeedGateway, notify::PushNotificationGateway},
        repositories::*,
        token::{SigningSecrets, TokenService},
        usecases::{self, ErrorKind},
    };
    pub use cufi_entities::builders::*;
    pub use time::macros::date;

    pub mod sqlite {
        pub use super::super::super::sqlite::*;
    }

    pub use crate::{error::AppError, prelude as flows};

    /// A feed that always delivers the same JSON.
    pub struct StaticFeed(pub Option<&'static str>);

    impl EventFeedGateway for StaticFeed {
        fn fetch_events_json(&self) -> anyhow::Result<String> {
            self.0
                .map(ToOwned::to_owned)
                .ok_or_else(|| anyhow!("The agenda is unreachable"))
        }
    }

    #[derive(Default)]
    pub struct RecordingPush {
        pub sent: RefCell<Vec<String>>,
    }

    impl PushNotificationGateway for RecordingPush {
        fn send_push(&self, device_token: &str, _: &str, _: &str) -> anyhow::Result<()> {
            self.sent.borrow_mut().push(device_token.to_owned());
            Ok(())
        }
    }

    pub const FEED: &str = r#"[
        {
            "data_inici": "2024-06-02T00:00:00.000",
            "data_fi": "2024-06-02T00:00:00.000",
            "denominaci": "Concert al parc",
            "descripcio": "<p>Live music</p>",
            "tags_mbits": "agenda:ambits/musica",
            "tags_categor_es": "agenda:categories/concerts",
            "comarca_i_municipi": "agenda:ubicacions/barcelona/barcelones/barcelona",
            "latitud": "41.38",
            "longitud": "2.17"
        },
        {
            "data_inici": "2024-06-10T00:00:00.000",
            "data_fi": "2024-06-12T00:00:00.000",
            "denominaci": "Fira del llibre",
            "descripcio": "Books",
            "tags_categor_es": "agenda:categories/fires",
            "latitud": null,
            "longitud": null
        },
        {
            "data_inici": "2024-06-03T00:00:00.000",
            "data_fi": "2024-06-03T00:00:00.000",
            "denominaci": "Lost",
            "latitud": "north",
            "longitud": "2.17"
        },
        42
    ]"#;

    pub struct BackendFixture {
        pub db_connections: sqlite::Connections,
        pub tokens: TokenService,
    }

    impl BackendFixture {
        pub fn new() -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            let db_connections = sqlite::Connections::init(":memory:", 1).unwrap();
            cufi_db_sqlite::run_embedded_database_migrations(db_connections.exclusive().unwrap())
                .unwrap();
            Self {
                db_connections,
                tokens: TokenService::new(SigningSecrets::random()),
            }
        }

        pub fn import_feed(&self) -> flows::ImportSummary {
            flows::import_events_from_feed(&self.db_connections, &StaticFeed(Some(FEED))).unwrap()
        }

        pub fn create_event(&self, details: EventDetails) -> EventId {
            self.db_connections
                .exclusive()
                .unwrap()
                .transaction(|conn| conn.create_event(&details))
                .unwrap()
        }

        pub fn event_id_of(&self, denomination: &str) -> EventId {
            let filter = EventFilter {
                denomination: Some(denomination.to_owned()),
                date_from: Some(date!(1900 - 01 - 01)),
                ..Default::default()
            };
            let events = self
                .db_connections
                .shared()
                .unwrap()
                .query_events(&filter, &Pagination::default())
                .unwrap();
            assert_eq!(events.len(), 1);
            events[0].id
        }

        pub fn register(&self, id: &str, preferred_categories: &str) {
            flows::register_user(
                &self.db_connections,
                usecases::NewUser {
                    id: id.into(),
                    name: id.into(),
                    preferred_categories: preferred_categories.into(),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        pub fn login(&self, id: &str, device_token: Option<&str>) -> String {
            flows::login(
                &self.db_connections,
                &self.tokens,
                &id.into(),
                device_token.map(ToOwned::to_owned),
                None,
            )
            .unwrap()
        }
    }
}
