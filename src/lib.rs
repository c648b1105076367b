#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod cli;
pub mod core;
pub mod greenbutton;
pub mod prelude;
pub mod quantity;
pub mod report;
pub mod sense;
pub mod tables;
