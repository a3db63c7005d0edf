// src/repositories/mod.rs

pub mod postgres;

pub use carelink_common::traits::repository_traits::{CareLinksRepository, LinkRequestsRepository};
pub use postgres::care_links::PostgresCareLinksRepository;
pub use postgres::link_requests::PostgresLinkRequestsRepository;
