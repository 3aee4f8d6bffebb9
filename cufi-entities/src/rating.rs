use crate::id::*;

/// The score a single user assigned to an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub event_id: EventId,
    pub user_id: UserId,
    pub score: f64,
}

/// Mean of all scores or `0` if there are none.
pub fn average_score<'a>(ratings: impl IntoIterator<Item = &'a Rating>) -> f64 {
    let (sum, count) = ratings
        .into_iter()
        .fold((0.0, 0u64), |(sum, count), r| (sum + r.score, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
