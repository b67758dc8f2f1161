mod alert;
mod button;
mod password_input;
mod spinner;

pub(crate) use alert::{Alert, AlertKind};
pub(crate) use button::Button;
pub(crate) use password_input::PasswordInput;
pub(crate) use spinner::{LoadingScreen, Spinner};
