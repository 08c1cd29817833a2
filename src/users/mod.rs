pub mod dto;
pub mod memory;
pub mod model;
pub mod nickname;
pub mod password;
pub mod pg;
pub mod service;
pub mod store;
pub mod token;
