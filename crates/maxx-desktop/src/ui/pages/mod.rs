mod login;
mod profile;
mod register;

pub use login::render as render_login;
pub use profile::render as render_profile;
pub use register::render as render_register;
