pub mod recursive;
