pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{event_builder::*, user_builder::*};

pub mod event_builder {

    use super::*;
    use crate::{event::*, id::*, time::*};

    #[derive(Debug)]
    pub struct EventDetailsBuild {
        details: EventDetails,
    }

    impl EventDetailsBuild {
        pub fn start_date(mut self, date: Date) -> Self {
            self.details.start_date = date;
            self
        }
        pub fn end_date(mut self, date: Date) -> Self {
            self.details.end_date = date;
            self
        }
        pub fn dates(self, date: Date) -> Self {
            self.start_date(date).end_date(date)
        }
        pub fn denomination(mut self, denomination: &str) -> Self {
            self.details.denomination = denomination.into();
            self
        }
        pub fn description(mut self, description: &str) -> Self {
            self.details.description = description.into();
            self
        }
        pub fn price(mut self, price: &str) -> Self {
            self.details.price = price.into();
            self
        }
        pub fn ambit(mut self, ambit: &str) -> Self {
            self.details.ambit = ambit.into();
            self
        }
        pub fn category(mut self, category: &str) -> Self {
            self.details.category = category.into();
            self
        }
        pub fn other_categories(mut self, other_categories: &str) -> Self {
            self.details.other_categories = other_categories.into();
            self
        }
        pub fn region(mut self, region: &str) -> Self {
            self.details.region = region.into();
            self
        }
        pub fn images(mut self, images: &str) -> Self {
            self.details.images = images.into();
            self
        }
        pub fn pos(mut self, latitude: f64, longitude: f64) -> Self {
            self.details.latitude = latitude;
            self.details.longitude = longitude;
            self
        }
        pub fn finish(self) -> EventDetails {
            self.details
        }
        pub fn finish_with_id(self, id: i64) -> Event {
            Event {
                id: EventId::new(id),
                details: self.details,
            }
        }
    }

    impl Builder for EventDetails {
        type Build = EventDetailsBuild;
        fn build() -> EventDetailsBuild {
            EventDetailsBuild {
                details: EventDetails {
                    start_date: time::macros::date!(2024 - 06 - 01),
                    end_date: time::macros::date!(2024 - 06 - 01),
                    denomination: "".into(),
                    description: "".into(),
                    price: "".into(),
                    schedule: "".into(),
                    subtitle: "".into(),
                    ambit: "".into(),
                    category: "".into(),
                    other_categories: "".into(),
                    link: "".into(),
                    images: "".into(),
                    address: "".into(),
                    region: "".into(),
                    email: "".into(),
                    space: "".into(),
                    latitude: 0.0,
                    longitude: 0.0,
                    phone: "".into(),
                    app_image: "".into(),
                },
            }
        }
    }
}

pub mod user_builder {

    use super::*;
    use crate::user::*;

    #[derive(Debug)]
    pub struct UserBuild {
        user: User,
    }

    impl UserBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.user.id = id.into();
            self
        }
        pub fn name(mut self, name: &str) -> Self {
            self.user.name = name.into();
            self
        }
        pub fn preferred_categories(mut self, categories: &str) -> Self {
            self.user.preferred_categories = categories.into();
            self
        }
        pub fn admin(mut self) -> Self {
            self.user.is_admin = true;
            self
        }
        pub fn finish(self) -> User {
            self.user
        }
    }

    impl Builder for User {
        type Build = UserBuild;
        fn build() -> UserBuild {
            UserBuild {
                user: User {
                    id: "".into(),
                    name: "".into(),
                    birth_date: "".into(),
                    profile_image: "".into(),
                    preferred_categories: "".into(),
                    is_admin: false,
                },
            }
        }
    }
}
