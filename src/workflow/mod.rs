pub mod fetch;
pub mod pipeline;
pub mod summarize;

#[cfg(test)]
pub mod testing;
