pub mod audit;
pub mod config;
pub mod controller;
pub mod error;
pub mod installer;
pub mod service;
pub mod state;
pub mod storage;
