pub mod appliances;
pub mod auth;
mod client;
pub mod error;
pub mod lenient;
pub mod records;
pub mod reference;
pub mod statistics;

pub use self::{
    client::{AuthCheck, Client},
    error::ApiError,
};
