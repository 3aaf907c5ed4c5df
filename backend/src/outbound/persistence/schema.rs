//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts for every role.
    users (id) {
        id -> Uuid,
        /// Stored lower-cased; unique.
        email -> Text,
        /// Argon2id PHC string.
        password_hash -> Text,
        name -> Nullable<Text>,
        phone -> Nullable<Text>,
        role -> Text,
        /// `false` means suspended.
        is_verified -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Fleet-owner companies.
    companies (id) {
        id -> Uuid,
        owner_user_id -> Uuid,
        name -> Text,
        address -> Nullable<Text>,
        gst_vat_id -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    driver_profiles (id) {
        id -> Uuid,
        user_id -> Uuid,
        license_number -> Text,
        license_expiry -> Nullable<Date>,
        experience_years -> Int4,
    }
}

diesel::table! {
    trucks (id) {
        id -> Uuid,
        company_id -> Uuid,
        registration_number -> Text,
        truck_type -> Text,
        capacity_tons -> Float8,
        status -> Text,
        assigned_driver_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Freight posted by shippers.
    loads (id) {
        id -> Uuid,
        shipper_id -> Uuid,
        title -> Text,
        goods_type -> Nullable<Text>,
        weight_tons -> Float8,
        pickup_location -> Text,
        delivery_location -> Text,
        pickup_window_start -> Nullable<Timestamptz>,
        pickup_window_end -> Nullable<Timestamptz>,
        status -> Text,
        assigned_truck_id -> Nullable<Uuid>,
        assigned_driver_id -> Nullable<Uuid>,
        price_fixed -> Nullable<Float8>,
        bidding_enabled -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    bids (id) {
        id -> Uuid,
        load_id -> Uuid,
        bidder_id -> Uuid,
        proposed_price -> Float8,
        message -> Text,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// At most one trip per load (`load_id` is unique).
    trips (id) {
        id -> Uuid,
        load_id -> Uuid,
        truck_id -> Uuid,
        driver_id -> Uuid,
        start_time -> Nullable<Timestamptz>,
        pickup_time -> Nullable<Timestamptz>,
        delivery_time -> Nullable<Timestamptz>,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    payments (id) {
        id -> Uuid,
        load_id -> Uuid,
        payer_id -> Uuid,
        payee_id -> Uuid,
        amount -> Float8,
        status -> Text,
        method -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Polymorphic attachments keyed by `(owner_type, owner_id)`.
    documents (id) {
        id -> Uuid,
        owner_type -> Text,
        owner_id -> Uuid,
        doc_type -> Text,
        file_ref -> Text,
        is_verified -> Bool,
        expiry_date -> Nullable<Date>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    messages (id) {
        id -> Uuid,
        sender_id -> Uuid,
        receiver_id -> Uuid,
        load_id -> Nullable<Uuid>,
        content -> Text,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    disputes (id) {
        id -> Uuid,
        trip_id -> Nullable<Uuid>,
        load_id -> Nullable<Uuid>,
        raised_by_id -> Uuid,
        against_user_id -> Nullable<Uuid>,
        reason -> Text,
        status -> Text,
        resolution -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// A partial unique index keeps at most one row active.
    commission_rules (id) {
        id -> Uuid,
        name -> Text,
        percentage -> Float8,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(companies -> users (owner_user_id));
diesel::joinable!(driver_profiles -> users (user_id));
diesel::joinable!(trucks -> companies (company_id));
diesel::joinable!(bids -> loads (load_id));
diesel::joinable!(trips -> loads (load_id));
diesel::joinable!(trips -> trucks (truck_id));
diesel::joinable!(payments -> loads (load_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    companies,
    driver_profiles,
    trucks,
    loads,
    bids,
    trips,
    payments,
    documents,
    messages,
    disputes,
    commission_rules,
);
