use crate::{entities::*, repositories::*};

type Result<T> = std::result::Result<T, Error>;

/// Attach the derived score and number of assistants.
pub fn decorate_event<R>(repo: &R, event: Event) -> Result<DecoratedEvent>
where
    R: RatingRepo + AssistanceRepo,
{
    let ratings = repo.load_ratings_of_event(event.id)?;
    let number_of_assistants = repo.count_assistants(event.id)?;
    Ok(DecoratedEvent {
        score: average_score(&ratings),
        number_of_assistants,
        event,
    })
}

pub fn decorate_events<R>(repo: &R, events: Vec<Event>) -> Result<Vec<DecoratedEvent>>
where
    R: RatingRepo + AssistanceRepo,
{
    events
        .into_iter()
        .map(|event| decorate_event(repo, event))
        .collect()
}
