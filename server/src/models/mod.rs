pub mod event;
pub mod location;
pub mod session;
pub mod user;

pub use event::{AddEventForm, Event, EventListing, NewEvent};
pub use location::Location;
pub use session::{CurrentUser, Session};
pub use user::{Credentials, NewUser, User};
