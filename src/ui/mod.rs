pub mod tokens;
pub mod window;
