//! Contact profile suggestions extracted from transcribed voice memos

pub mod api;
pub mod app;
pub mod db;
pub mod model;
pub mod service;

#[cfg(test)]
mod testing;
