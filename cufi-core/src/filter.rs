use crate::entities::*;

/// Criteria for searching events.
///
/// Textual criteria match if the corresponding field contains the given
/// text. Missing criteria are unconstrained and all present criteria must
/// match.
#[rustfmt::skip]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub ambit            : Option<String>,
    pub category         : Option<String>,
    pub other_categories : Option<String>,
    /// Inclusive lower bound of the start date
    pub date_from        : Option<Date>,
    /// Inclusive upper bound of the end date
    pub date_to          : Option<Date>,
    pub price            : Option<String>,
    pub denomination     : Option<String>,
    pub region           : Option<String>,
    pub description      : Option<String>,
    pub radius           : Option<f64>,
    pub latitude         : Option<f64>,
    pub longitude        : Option<f64>,
}

/// A position and a radius that is compared with the *squared*
/// euclidean distance of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCircle {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

impl GeoCircle {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        let d_lat = latitude - self.latitude;
        let d_lng = longitude - self.longitude;
        d_lat * d_lat + d_lng * d_lng <= self.radius
    }
}

impl EventFilter {
    /// Only effective if the radius and both coordinates are present.
    pub fn geo_circle(&self) -> Option<GeoCircle> {
        match (self.radius, self.latitude, self.longitude) {
            (Some(radius), Some(latitude), Some(longitude)) => Some(GeoCircle {
                latitude,
                longitude,
                radius,
            }),
            _ => None,
        }
    }

    pub fn text_criteria(&self) -> impl Iterator<Item = (TextField, &str)> {
        [
            (TextField::Ambit, &self.ambit),
            (TextField::Category, &self.category),
            (TextField::OtherCategories, &self.other_categories),
            (TextField::Price, &self.price),
            (TextField::Denomination, &self.denomination),
            (TextField::Region, &self.region),
            (TextField::Description, &self.description),
        ]
        .into_iter()
        .filter_map(|(field, text)| text.as_deref().map(|text| (field, text)))
    }

    pub fn matches(&self, event: &EventDetails) -> bool {
        if self
            .text_criteria()
            .any(|(field, text)| !field.value_of(event).contains(text))
        {
            return false;
        }
        if let Some(from) = self.date_from {
            if event.start_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if event.end_date > to {
                return false;
            }
        }
        if let Some(circle) = self.geo_circle() {
            if !circle.contains(event.latitude, event.longitude) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Ambit,
    Category,
    OtherCategories,
    Price,
    Denomination,
    Region,
    Description,
}

impl TextField {
    pub fn value_of(self, event: &EventDetails) -> &str {
        match self {
            Self::Ambit => &event.ambit,
            Self::Category => &event.category,
            Self::OtherCategories => &event.other_categories,
            Self::Price => &event.price,
            Self::Denomination => &event.denomination,
            Self::Region => &event.region,
            Self::Description => &event.description,
        }
    }
}

/// Does any of the taxonomy fields contain the tag?
pub fn is_tagged_with(event: &EventDetails, tag: &str) -> bool {
    event.ambit.contains(tag) || event.category.contains(tag) || event.other_categories.contains(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cufi_entities::builders::*;
    use time::macros::date;

    fn at(latitude: f64, longitude: f64) -> EventDetails {
        EventDetails::build().pos(latitude, longitude).finish()
    }

    fn around(latitude: f64, longitude: f64, radius: f64) -> EventFilter {
        EventFilter {
            radius: Some(radius),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Default::default()
        }
    }

    #[test]
    fn match_event_at_the_query_position() {
        assert!(around(0.0, 0.0, 1.0).matches(&at(0.0, 0.0)));
    }

    #[test]
    fn compare_radius_with_squared_distance() {
        assert!(!around(0.0, 0.0, 0.0).matches(&at(0.1, 0.0)));
        // A distance of 0.5 is within a radius of 0.25 but not 0.2
        assert!(around(0.0, 0.0, 0.25).matches(&at(0.5, 0.0)));
        assert!(!around(0.0, 0.0, 0.2).matches(&at(0.5, 0.0)));
        assert!(around(1.0, 1.0, 0.5).matches(&at(1.5, 1.5)));
    }

    #[test]
    fn ignore_incomplete_geo_criteria() {
        let filter = EventFilter {
            radius: Some(0.0),
            latitude: Some(10.0),
            ..Default::default()
        };
        assert!(filter.geo_circle().is_none());
        assert!(filter.matches(&at(50.0, 50.0)));
    }

    #[test]
    fn match_text_criteria_as_substrings() {
        let event = EventDetails::build()
            .denomination("Concert de primavera")
            .ambit("music,dance")
            .region("Barcelonès")
            .finish();
        let filter = EventFilter {
            denomination: Some("primavera".into()),
            ambit: Some("dance".into()),
            ..Default::default()
        };
        assert!(filter.matches(&event));
        let filter = EventFilter {
            region: Some("Girona".into()),
            ..filter
        };
        assert!(!filter.matches(&event));
    }

    #[test]
    fn match_date_bounds() {
        let event = EventDetails::build()
            .start_date(date!(2024 - 06 - 01))
            .end_date(date!(2024 - 06 - 03))
            .finish();
        let filter = EventFilter {
            date_from: Some(date!(2024 - 06 - 01)),
            date_to: Some(date!(2024 - 06 - 03)),
            ..Default::default()
        };
        assert!(filter.matches(&event));
        let filter = EventFilter {
            date_from: Some(date!(2024 - 06 - 02)),
            ..Default::default()
        };
        assert!(!filter.matches(&event));
        let filter = EventFilter {
            date_to: Some(date!(2024 - 06 - 02)),
            ..Default::default()
        };
        assert!(!filter.matches(&event));
    }

    #[test]
    fn check_tags_of_all_taxonomy_fields() {
        let event = EventDetails::build()
            .ambit("cultura")
            .other_categories("music")
            .finish();
        assert!(is_tagged_with(&event, "music"));
        assert!(is_tagged_with(&event, "cult"));
        assert!(!is_tagged_with(&event, "theatre"));
    }
}
