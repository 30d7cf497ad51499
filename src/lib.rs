pub mod books;
pub mod catalog;
pub mod core;
pub mod fees;
pub mod gateway;
pub mod lending;
pub mod patrons;
pub mod payments;
pub mod utils;
