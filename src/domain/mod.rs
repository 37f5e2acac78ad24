pub mod catalog;
pub mod clients;
pub mod expenses;
pub mod login;
pub mod staff;
