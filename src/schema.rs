// Kept in sync by hand with the DDL in repository/context.rs.

diesel::table! {
    urls (id) {
        id -> BigInt,
        name -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    url_checks (id) {
        id -> BigInt,
        url_id -> BigInt,
        status_code -> Nullable<Integer>,
        h1 -> Nullable<Text>,
        title -> Nullable<Text>,
        description -> Nullable<Text>,
        created_at -> Text,
    }
}
