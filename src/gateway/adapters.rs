pub mod simulated;
#[cfg(test)]
pub mod stub;
