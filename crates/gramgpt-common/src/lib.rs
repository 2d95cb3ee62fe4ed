pub mod dotenv;
pub mod errors;
pub mod events;
pub mod id;
pub mod language;
pub mod notifications;

pub use dotenv::load_dotenv;
pub use errors::{ConfigError, GramError};
pub use events::{ChatEvent, EventBus, TurnOutcome};
pub use id::{new_correlation_id, SessionId};
pub use language::{LanguageTag, LANGUAGES};
pub use notifications::{Notification, NotificationLevel, NotificationQueue};
