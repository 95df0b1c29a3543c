// Profile Store: the user's stored details, uploaded resume, and saved form state.

pub mod form_state;
pub mod handlers;
pub mod store;
pub mod validation;
