pub mod error;
pub mod config;

// Club domain modules
pub mod availability;
pub mod booking;
pub mod common;
pub mod court;
pub mod member;
pub mod profile;
pub mod schedule;
pub mod stats;
pub mod wallet;

pub use error::*;
pub use config::*;

pub use availability::*;
pub use booking::*;
pub use common::*;
pub use court::*;
pub use member::*;
pub use profile::*;
pub use schedule::*;
pub use stats::*;
pub use wallet::*;
