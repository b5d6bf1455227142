// Authentication primitives: password hashing and JWT issuance

pub mod jwt;
pub mod password;
