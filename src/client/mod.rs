//! Chat client for the nutrition service.

pub mod chat;
pub mod protocol;
pub mod terminal;
pub mod transport;

pub use chat::{ChatEntry, ChatForm, ChatLog, ChatSurface, Lookup, NutritionChatClient, Role};
pub use protocol::{NutritionQuery, NutritionReply};
pub use transport::{ClientError, HttpTransport, NutritionTransport};
