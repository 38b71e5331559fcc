mod handler;
mod service;
pub mod types;

#[cfg(test)]
mod fakes;

pub use handler::handler;
pub use service::service;
