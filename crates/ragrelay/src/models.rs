//! These models represent the objects passed through the relay
//!
//! The inbound chat body, the conversation handed to the augmenter and the body
//! forwarded to the completion backend all share one OpenAI-compatible shape, so
//! a single set of structs covers every hop. Fields we do not interpret are kept
//! verbatim and forwarded.
pub mod message;
pub mod role;
