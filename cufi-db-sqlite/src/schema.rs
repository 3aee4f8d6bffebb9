///////////////////////////////////////////////////////////////////////
// Events
///////////////////////////////////////////////////////////////////////

table! {
    events (id) {
        id -> BigInt,
        // YYYY-MM-DD
        start_date -> Text,
        // YYYY-MM-DD
        end_date -> Text,
        denomination -> Text,
        description -> Text,
        price -> Text,
        schedule -> Text,
        subtitle -> Text,
        ambit -> Text,
        category -> Text,
        other_categories -> Text,
        link -> Text,
        images -> Text,
        address -> Text,
        region -> Text,
        email -> Text,
        space -> Text,
        latitude -> Double,
        longitude -> Double,
        phone -> Text,
        app_image -> Text,
    }
}

table! {
    event_ratings (event_id, user_id) {
        event_id -> BigInt,
        user_id -> Text,
        score -> Double,
    }
}

joinable!(event_ratings -> events (event_id));

table! {
    assistances (user_id, event_id) {
        user_id -> Text,
        event_id -> BigInt,
    }
}

joinable!(assistances -> events (event_id));

///////////////////////////////////////////////////////////////////////
// Users
///////////////////////////////////////////////////////////////////////

table! {
    users (id) {
        id -> Text,
        name -> Text,
        birth_date -> Text,
        profile_image -> Text,
        preferred_categories -> Text,
        is_admin -> Bool,
    }
}

table! {
    sessions (user_id) {
        user_id -> Text,
        token -> Text,
        device_token -> Nullable<Text>,
    }
}

///////////////////////////////////////////////////////////////////////
// Saved lists
///////////////////////////////////////////////////////////////////////

table! {
    saved_lists (id) {
        id -> BigInt,
        owner -> Text,
        name -> Text,
        description -> Text,
    }
}

table! {
    saved_list_events (list_id, event_id) {
        list_id -> BigInt,
        event_id -> BigInt,
    }
}

joinable!(saved_list_events -> saved_lists (list_id));
joinable!(saved_list_events -> events (event_id));

///////////////////////////////////////////////////////////////////////
// Incidents
///////////////////////////////////////////////////////////////////////

table! {
    incidents (id) {
        id -> BigInt,
        user_id -> Text,
        event_id -> BigInt,
        description -> Text,
        response -> Nullable<Text>,
        resolved -> Bool,
    }
}

joinable!(incidents -> events (event_id));

allow_tables_to_appear_in_same_query!(
    events,
    event_ratings,
    assistances,
    users,
    sessions,
    saved_lists,
    saved_list_events,
    incidents,
);
