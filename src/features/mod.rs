pub mod feature_engineer;
