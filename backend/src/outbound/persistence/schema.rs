//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When the
//! migrations change, regenerate them with `diesel print-schema`.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// Argon2 PHC string; never plaintext.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Food venues. `rating` and `num_ratings` are derived from `comments`.
    places (id) {
        id -> Uuid,
        name -> Varchar,
        category -> Varchar,
        image_url -> Nullable<Varchar>,
        schedule -> Jsonb,
        rating -> Float8,
        num_ratings -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Dishes on a place's menu; `position` keeps submission order.
    menu_items (id) {
        id -> Uuid,
        place_id -> Uuid,
        position -> Int4,
        category -> Varchar,
        dish_name -> Varchar,
        price -> Float8,
    }
}

diesel::table! {
    /// User reviews. `seq` is an identity column giving insertion order.
    comments (id) {
        id -> Uuid,
        seq -> Int8,
        place_id -> Uuid,
        user_id -> Uuid,
        text -> Text,
        rating -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(menu_items -> places (place_id));
diesel::joinable!(comments -> places (place_id));
diesel::joinable!(comments -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, places, menu_items, comments);
