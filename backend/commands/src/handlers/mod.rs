//! Built-in command handlers.

pub mod admin;
pub mod afk;
pub mod download;
pub mod fun;
pub mod help;
pub mod image;
pub mod meme;
pub mod sed;
pub mod translate;
pub mod utility;

pub use admin::{GetModelCommand, GetTempCommand, SetModelCommand, SetTempCommand};
pub use afk::{AfkCommand, NoAfkCommand};
pub use download::DownloadCommand;
pub use fun::{AnimationArena, HahaCommand, RandmojiCommand};
pub use help::HelpCommand;
pub use image::ImageCommand;
pub use meme::MemeCommand;
pub use sed::SedCommand;
pub use translate::{register_translation_commands, TranslateCommand};
pub use utility::{PingCommand, SupportedLangsCommand};
