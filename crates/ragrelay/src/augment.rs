use crate::models::message::Message;
use crate::models::role::Role;

pub const CONTEXT_LEAD_IN: &str = "Based on the context provided, ";
const CONTEXT_INSTRUCTION: &str =
    "You are a helpful AI assistant. Base your response ONLY on the following context:";

/// Surface retrieved context to the model.
///
/// The last user message gets a lead-in referring to the context, and a system
/// message carrying the context is inserted directly before it. Empty context,
/// or a conversation without any user message, leaves `messages` untouched.
pub fn augment_messages(mut messages: Vec<Message>, context: &str) -> Vec<Message> {
    if context.is_empty() {
        return messages;
    }

    let Some(position) = messages.iter().rposition(|m| m.role == Role::User) else {
        return messages;
    };

    let original = std::mem::take(&mut messages[position].content);
    messages[position].content = format!("{}{}", CONTEXT_LEAD_IN, original);
    messages.insert(
        position,
        Message::system(format!("{}\n\n{}", CONTEXT_INSTRUCTION, context)),
    );

    messages
}
