//! recolens-app: the detect → prompt → recommend flow and its command-line front end

pub mod error;
pub mod input;
pub mod session;

pub use error::AppError;
pub use input::{load_image, ALLOWED_EXTENSIONS};
pub use session::{Outcome, Session, SessionError};
