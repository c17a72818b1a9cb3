// src/models/mod.rs

pub mod contact;
pub mod otp;
pub mod question;
pub mod response;
pub mod ticket;
pub mod user;
