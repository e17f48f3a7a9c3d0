#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod cli;
pub mod conversation;
pub mod core;
pub mod customer;
pub mod data;
pub mod prelude;
pub mod prompt;
pub mod quantity;
pub mod tables;
