pub mod base;
pub mod openai;

#[cfg(test)]
pub mod mock;
