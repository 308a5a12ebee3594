pub mod api_connection;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod i18n;
pub mod presentation;
pub mod recipe_book;
pub mod recipe_generator;
pub mod recipe_model;
pub mod shell;
pub mod storage;
