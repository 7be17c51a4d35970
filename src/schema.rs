// Database schema definitions
diesel::table! {
    users (id) {
        id -> Integer,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        phone_number -> Varchar,
        role -> Varchar,
    }
}

diesel::table! {
    jobs (id) {
        id -> Integer,
        title -> Varchar,
        description -> Text,
        salary -> Double,
    }
}

diesel::table! {
    applications (id) {
        id -> Integer,
        job_id -> Integer,
        job_seeker_id -> Integer,
        status -> Varchar,
        applied_date -> Timestamp,
        resume -> Nullable<Binary>,
    }
}

diesel::joinable!(applications -> jobs (job_id));
diesel::joinable!(applications -> users (job_seeker_id));

diesel::allow_tables_to_appear_in_same_query!(users, jobs, applications);
