mod glucose;
mod user;

pub use glucose::GlucoseRepository;
pub use user::UserRepository;
