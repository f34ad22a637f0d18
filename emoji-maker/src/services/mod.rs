pub mod adapters;
pub mod diesel_store;
pub mod gallery_service;
pub mod generation;
pub mod ports;
pub mod profile_service;

#[cfg(test)]
pub mod fakes;
