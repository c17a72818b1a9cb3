// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod contact;
pub mod quiz;
pub mod ticket;
