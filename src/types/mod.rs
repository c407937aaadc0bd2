pub mod daily_record;
pub mod feature_vector;
pub mod summary;
pub mod weather_code;
