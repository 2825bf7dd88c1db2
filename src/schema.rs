table! {
    users (id) {
        id -> Text,
        push_tokens -> Array<Text>,
    }
}

table! {
    notifications (id) {
        id -> Uuid,
        recipient_id -> Text,
        title -> Text,
        message -> Text,
        category -> Text,
        entity_id -> Nullable<Text>,
        scheduled_for -> Nullable<Timestamptz>,
        read -> Bool,
        created_at -> Timestamptz,
    }
}

table! {
    appointments (id) {
        id -> Text,
        assignee_id -> Nullable<Text>,
        requester_id -> Nullable<Text>,
        service_name -> Nullable<Text>,
        service_title -> Nullable<Text>,
        starts_at -> Nullable<Timestamptz>,
    }
}
