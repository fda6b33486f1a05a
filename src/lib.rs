//! Collects every readable file under a project root into one markdown
//! document, followed by a tree showing which files could be read.

pub mod app;
