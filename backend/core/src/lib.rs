pub mod error;
pub mod event;
pub mod lang;
pub mod traits;

pub use error::{BotError, ParameterError, RegistrationError};
pub use event::{
    ChatMessage, InboundEvent, MediaContent, MediaKind, MediaRef, MessageMeta, QuotedMessage,
};
pub use lang::{language_by_code, language_name, Language, SUPPORTED_LANGUAGES};
pub use traits::{
    Delivery, ImageGenerator, LanguageDetector, MediaDownloader, Meme, MemeFetcher, Translator,
};
