//! Hairstyle try-on service: builds a Gemini image-edit request from a portrait and a curated
//! style selection, tries the configured models in order, and returns the edited image with a
//! short rationale.

pub mod catalog;
pub mod config;
pub mod data_url;
pub mod error;
pub mod gemini;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod prompt;
pub mod routes;
