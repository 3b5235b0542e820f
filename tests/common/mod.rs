#![allow(dead_code)]

pub mod tree_generator;
