pub mod errors;
pub mod db;
pub mod vote;

#[cfg(test)]
mod tests;
