pub mod ods;
pub mod urls;
