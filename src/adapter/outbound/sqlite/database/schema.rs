// Diesel table definitions, kept in step with migrations/.

diesel::table! {
    positions (pair) {
        pair -> Text,
        amount -> Text,
        avg_price -> Text,
        updated_at -> Text,
    }
}
