pub mod advice;
pub mod profile;
pub mod session;
