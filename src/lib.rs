//! Scrapes the HMRC register of Community Amateur Sports Clubs, derives a
//! stable `GB-CASC-xxxxxxxx` identifier per club, and emits CSV/JSON.

pub mod fetch;
pub mod loader;
pub mod lookup;
pub mod merge;
pub mod normalize;
pub mod orgid;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod titlecase;
