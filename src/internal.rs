pub mod config;
pub mod downloader;
pub mod entrance;
pub mod resource;
pub mod states;
