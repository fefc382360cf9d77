#![allow(dead_code)]

pub mod architecture;
pub mod pipeline;
pub mod sqlite;
