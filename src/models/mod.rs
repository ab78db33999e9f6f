//! Data models for the bookshelf

pub mod book;
