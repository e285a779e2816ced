pub mod app;
pub mod chart;
pub mod config;
pub mod demo_backend;
pub mod fetch_worker;
pub mod http_client;
pub mod nav;
pub mod pages;
pub mod query;
pub mod rows;
pub mod state;
pub mod ui;
pub mod view_model;
