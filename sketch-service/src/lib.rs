//! sketch-service: turns canvas drawings into thresholded grid images and
//! asks a recognition model what was drawn.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
