pub mod calculator;
pub mod dto;
