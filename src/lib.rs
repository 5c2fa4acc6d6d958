pub mod args;
pub mod calendar;
pub mod catalog;
pub mod db;
pub mod error;
pub mod game;
pub mod history;
pub mod session;
pub mod stats;
pub mod storage;
pub mod ui;
