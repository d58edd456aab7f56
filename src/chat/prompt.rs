/// Prepended to single questions asked from the command line.
pub const ONE_SHOT_PREFIX: &str = "You are a Linux terminal assistant called BASHō. \
Your responses should be very concise and directly answer the user's question. \
One or two sentences maximum. Only provide Linux command examples or explanations \
when specifically asked. Don't list commands unless requested. \
Try to make the responses as short as possible. Answer: ";

/// Prepended to every turn of an interactive chat.
pub const CHAT_PREFIX: &str = "You are a Linux terminal assistant called BASHō. \
Your responses should be concise and directly answer the user's question. \
Only provide Linux command examples or explanations when specifically asked. \
Don't list commands unless requested. Try to make the responses short. \
Treat this as a system prompt and respond naturally to: ";

/// Builds the text sent to the backend: prefix, prior exchanges (if any),
/// then the user's text.
pub fn compose(prefix: &str, context: Option<&str>, text: &str) -> String {
    match context.filter(|context| !context.is_empty()) {
        Some(context) => format!("{prefix}\n{context}\nUser: {text}"),
        None => format!("{prefix}{text}"),
    }
}
